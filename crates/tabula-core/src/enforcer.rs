use crate::{shape, Shape};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("Invalid dimensions {rows}x{cols}, rows and cols must be positive.")]
    InvalidDimension { rows: i64, cols: i64 },
    #[error("Ragged shape at row {row}: expected {expected} columns, got {actual}.")]
    RaggedShape {
        row: usize, //1-based
        expected: usize,
        actual: usize,
    },
    #[error("Data length mismatch, shape requires {expected} elements, got {actual}.")]
    DataLength { expected: usize, actual: usize },
    #[error("Dimension mismatch, cannot compute {lhs:?} {op} {rhs:?}.")]
    DimensionMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },
    #[error("Bad index {index}, bound is {bound}.")]
    IndexOutOfRange { index: i64, bound: usize },
}

fn as_signed(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// # Enforcer
///
/// Enforcer checks shape and index invariants before any storage is touched.
pub struct Enforcer;

impl Enforcer {
    pub fn check_dimensions(rows: usize, cols: usize) -> Result<Shape, InvariantError> {
        let shape = shape![rows, cols];
        if shape.is_empty() {
            return Err(InvariantError::InvalidDimension {
                rows: as_signed(rows),
                cols: as_signed(cols),
            });
        }
        Ok(shape)
    }

    /// Infers the shape of nested rows. The first row fixes the column count.
    pub fn check_rows<T, R: AsRef<[T]>>(rows: &[R]) -> Result<Shape, InvariantError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let shape = Self::check_dimensions(rows.len(), cols)?;
        for (i, row) in rows.iter().enumerate() {
            let actual = row.as_ref().len();
            if actual != cols {
                return Err(InvariantError::RaggedShape {
                    row: i + 1,
                    expected: cols,
                    actual,
                });
            }
        }
        Ok(shape)
    }

    pub fn check_data_len(shape: &Shape, actual: usize) -> Result<(), InvariantError> {
        Self::check_dimensions(shape.rows(), shape.cols())?;
        match shape.checked_numel() {
            Some(expected) if expected == actual => Ok(()),
            expected => Err(InvariantError::DataLength {
                expected: expected.unwrap_or(usize::MAX),
                actual,
            }),
        }
    }

    pub fn check_shapes_equal(
        op: &'static str,
        lhs: &Shape,
        rhs: &Shape,
    ) -> Result<(), InvariantError> {
        if lhs != rhs {
            return Err(InvariantError::DimensionMismatch {
                op,
                lhs: *lhs,
                rhs: *rhs,
            });
        }
        Ok(())
    }

    /// `lhs.cols` must equal `rhs.rows`.
    pub fn check_inner_dims(
        op: &'static str,
        lhs: &Shape,
        rhs: &Shape,
    ) -> Result<(), InvariantError> {
        if lhs.cols() != rhs.rows() {
            return Err(InvariantError::DimensionMismatch {
                op,
                lhs: *lhs,
                rhs: *rhs,
            });
        }
        Ok(())
    }

    /// Resolves a 1-based index in `[1, bound]` to a 0-based offset.
    pub fn resolve_index(index: i64, bound: usize) -> Result<usize, InvariantError> {
        if index >= 1 && index <= as_signed(bound) {
            return Ok((index - 1) as usize);
        }
        Err(InvariantError::IndexOutOfRange { index, bound })
    }

    /// Like [`Enforcer::resolve_index`], but `-1` names the last element and
    /// `-bound` the first.
    pub fn resolve_relative(index: i64, bound: usize) -> Result<usize, InvariantError> {
        let len = as_signed(bound);
        if index < 0 && index >= -len {
            return Ok((len + index) as usize);
        }
        Self::resolve_index(index, bound)
    }
}
