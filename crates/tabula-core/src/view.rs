use crate::{Enforcer, InvariantError, Matrix, MatrixDType};

/// A window onto one row of a [`Matrix`].
///
/// The view holds a handle to its source, so the payload stays alive for as
/// long as the view does. Reads and writes go straight to the source's
/// storage: nothing is copied.
#[derive(Clone)]
pub struct RowView<T: MatrixDType> {
    src: Matrix<T>,
    offset: usize,
    len: usize,
}

impl<T: MatrixDType> RowView<T> {
    /// View of the 0-based row `row`. Callers check the bound.
    pub(crate) fn new(src: Matrix<T>, row: usize) -> Self {
        debug_assert!(row < src.rows());
        let len = src.cols();
        let offset = row * len;
        log::trace!("View of {:?} row {} at offset {}", src.id(), row, offset);
        Self { src, offset, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: matrices have at least one column.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Start of the row within the source's row-major payload.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 0-based row of the source this view covers.
    pub fn row(&self) -> usize {
        self.offset / self.len
    }

    pub fn source(&self) -> &Matrix<T> {
        &self.src
    }

    /// Reads element `j`, 0-based. Panics if out of bounds.
    #[inline]
    pub fn peek(&self, j: usize) -> T {
        assert!(j < self.len, "index {j} out of bounds for row of {}", self.len);
        self.src.storage().read()[self.offset + j]
    }

    /// Writes element `j`, 0-based. Panics if out of bounds.
    #[inline]
    pub fn poke(&self, j: usize, value: T) {
        assert!(j < self.len, "index {j} out of bounds for row of {}", self.len);
        self.src.storage().write()[self.offset + j] = value;
    }

    /// Reads element `index`, counted from 1. Negative indices count back
    /// from the end, `-1` being the last.
    pub fn get(&self, index: i64) -> Result<T, InvariantError> {
        let j = Enforcer::resolve_relative(index, self.len)?;
        Ok(self.peek(j))
    }

    /// Writes element `index`, with the same indexing as [`RowView::get`].
    pub fn set(&self, index: i64, value: T) -> Result<(), InvariantError> {
        let j = Enforcer::resolve_relative(index, self.len)?;
        self.poke(j, value);
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<T> {
        let buffer = self.src.storage().read();
        buffer.as_slice()[self.offset..self.offset + self.len].to_vec()
    }
}

impl<T: MatrixDType> std::fmt::Debug for RowView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowView")
            .field("src", &self.src.id())
            .field("offset", &self.offset)
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{InvariantError, Matrix};

    #[test]
    fn test_view_aliases_source() -> anyhow::Result<()> {
        let m = Matrix::from_rows(&[[1, 2], [3, 4]])?;
        let v = m.row(2)?;
        v.set(1, 30)?;
        assert_eq!(m.peek(1, 0), 30);

        m.poke(1, 1, 40);
        assert_eq!(v.get(2)?, 40);
        assert_eq!(v.get(-1)?, 40);
        assert_eq!(v.get(-2)?, 30);
        Ok(())
    }

    #[test]
    fn test_view_geometry() -> anyhow::Result<()> {
        let m = Matrix::<f64>::zeros(3, 4)?;
        let v = m.row(3)?;
        assert_eq!(v.len(), 4);
        assert_eq!(v.offset(), 8);
        assert_eq!(v.row(), 2);
        assert!(v.source().ptr_eq(&m));
        Ok(())
    }

    #[test]
    fn test_view_out_of_range() -> anyhow::Result<()> {
        let m = Matrix::<i32>::zeros(1, 3)?;
        let v = m.row(1)?;
        for bad in [0, 4, -4] {
            assert_eq!(
                v.get(bad),
                Err(InvariantError::IndexOutOfRange {
                    index: bad,
                    bound: 3
                })
            );
            assert!(v.set(bad, 1).is_err());
        }
        assert_eq!(m.to_vec(), vec![0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_view_outlives_matrix_handle() -> anyhow::Result<()> {
        let v = {
            let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]])?;
            m.row(1)?
        };
        assert_eq!(v.to_vec(), vec![1.0, 2.0]);
        assert_eq!(v.source().handle_count(), 1);
        Ok(())
    }

    #[test]
    fn test_row_bounds() -> anyhow::Result<()> {
        let m = Matrix::<i64>::zeros(2, 2)?;
        assert!(m.row(0).is_err());
        assert!(m.row(3).is_err());
        assert!(m.row(-1).is_err());
        assert!(m.row_at(1).is_some());
        assert!(m.row_at(2).is_none());
        Ok(())
    }
}
