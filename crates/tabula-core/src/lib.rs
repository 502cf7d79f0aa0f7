mod dtype;
mod enforcer;
mod format;
mod matrix;
mod matrix_id;
mod ops;
mod shape;
mod storage;
mod view;

pub use dtype::*;
pub use enforcer::*;
pub use matrix::*;
pub use matrix_id::*;
pub use ops::*;
pub use shape::*;
pub use storage::*;
pub use view::*;

#[macro_export]
macro_rules! shape {
    ($rows:expr, $cols:expr $(,)?) => {
        $crate::Shape::new($rows, $cols)
    };
}
