//! Canonical bracketed rendering.
//!
//! A matrix renders one bracketed group per row inside an outer pair of
//! brackets, `[[1, 2], [3, 4]]`. A row view renders a single group,
//! `[1, 2]`. Elements use the element type's `Display`, so `5.0_f64` renders
//! as `5`.
use std::fmt::{self, Display, Write};

use crate::{Matrix, MatrixDType, RowView};

fn write_row<T: Display, W: Write>(w: &mut W, row: &[T]) -> fmt::Result {
    w.write_char('[')?;
    for (j, v) in row.iter().enumerate() {
        if j > 0 {
            w.write_str(", ")?;
        }
        write!(w, "{v}")?;
    }
    w.write_char(']')
}

impl<T: MatrixDType> Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buffer = self.storage().read();
        f.write_char('[')?;
        for (i, row) in buffer.as_slice().chunks(self.cols()).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_row(f, row)?;
        }
        f.write_char(']')
    }
}

impl<T: MatrixDType> Display for RowView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buffer = self.source().storage().read();
        write_row(f, &buffer.as_slice()[self.offset()..self.offset() + self.len()])
    }
}
