use std::fmt::{Debug, Display};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DType {
    F32,
    F64,
    I32,
    I64,
}

impl DType {
    pub fn as_str(self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I32 => "i32",
            DType::I64 => "i64",
        }
    }
}

impl Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar types a [`Matrix`](crate::Matrix) can hold.
///
/// Arithmetic uses the type's own `+` and `*`, so integer matrices follow
/// Rust's integer overflow rules for the build profile.
pub trait MatrixDType:
    Copy
    + Debug
    + Display
    + PartialEq
    + num_traits::Zero
    + num_traits::NumOps
    + Send
    + Sync
    + 'static
{
    fn dt() -> DType;
}

macro_rules! map_type {
    ($t:ty, $v:ident) => {
        impl MatrixDType for $t {
            fn dt() -> DType {
                DType::$v
            }
        }
    };
}

map_type!(f32, F32);
map_type!(f64, F64);
map_type!(i32, I32);
map_type!(i64, I64);
