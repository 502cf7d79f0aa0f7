mod api;
mod error;
mod library;
mod marshal;
mod value;

#[cfg(feature = "pyo3")]
pub mod python;

pub use api::*;
pub use error::*;
pub use library::*;
pub use marshal::{
    dimensions, matrix_from_data, matrix_from_sequence, matrix_to_value, view_to_value,
};
pub use value::*;
