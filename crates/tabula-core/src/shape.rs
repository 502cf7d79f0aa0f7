/// Row and column counts of a matrix.
///
/// Matrices are always two dimensional, so unlike an N-d shape this is a
/// plain pair. Elements are laid out row-major: `(i, j)` lives at
/// `i * cols + j`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, derive_new::new)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn numel(&self) -> usize {
        self.rows * self.cols
    }

    pub fn checked_numel(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Row-major offset of `(row, col)`. Bounds are not checked.
    #[inline]
    pub fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}x{}]", self.rows, self.cols)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(any(test, feature = "testing"))]
mod arbitrary {
    use super::Shape;
    use proptest::prelude::*;
    use proptest::strategy::{BoxedStrategy, Strategy};
    use std::ops::Range;

    impl Arbitrary for Shape {
        type Parameters = (Range<usize>, Range<usize>);
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with((rows, cols): Self::Parameters) -> Self::Strategy {
            // Default parameters are empty ranges.
            let rows = if rows.is_empty() { 1..8 } else { rows };
            let cols = if cols.is_empty() { 1..8 } else { cols };
            (rows, cols)
                .prop_map(|(rows, cols)| Shape::new(rows, cols))
                .boxed()
        }
    }
}
