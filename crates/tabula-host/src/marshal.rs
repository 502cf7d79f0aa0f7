//! Conversions between host values and matrices.
use tabula::{shape, InvariantError, Matrix, RowView};

use crate::{HostError, HostResult, Value};

/// Reads a pair of host dimensions. Both must be positive integers.
pub fn dimensions(rows: &Value, cols: &Value) -> HostResult<(usize, usize)> {
    let (r, c) = (rows.as_index()?, cols.as_index()?);
    let invalid = || InvariantError::InvalidDimension { rows: r, cols: c };
    if r <= 0 || c <= 0 {
        return Err(invalid().into());
    }
    let r = usize::try_from(r).map_err(|_| invalid())?;
    let c = usize::try_from(c).map_err(|_| invalid())?;
    Ok((r, c))
}

fn numbers(items: &[Value]) -> HostResult<Vec<f64>> {
    items.iter().map(Value::as_number).collect()
}

/// Builds a matrix from a host sequence.
///
/// A sequence whose first element is itself a sequence is read as rows;
/// anything else is read as a single row vector.
pub fn matrix_from_sequence(items: &[Value]) -> HostResult<Matrix<f64>> {
    let nested = matches!(items.first(), Some(Value::Sequence(_)));
    if !nested {
        return Ok(Matrix::from_vec(numbers(items)?)?);
    }
    let rows = items
        .iter()
        .map(|row| numbers(row.as_sequence()?))
        .collect::<HostResult<Vec<_>>>()?;
    Ok(Matrix::from_rows(&rows)?)
}

/// Builds a `rows` x `cols` matrix from a flat, row-major host sequence.
pub fn matrix_from_data(items: &[Value], rows: &Value, cols: &Value) -> HostResult<Matrix<f64>> {
    let (r, c) = dimensions(rows, cols)?;
    Ok(Matrix::from_data(numbers(items)?, shape![r, c])?)
}

pub fn matrix_to_value(m: &Matrix<f64>) -> Value {
    Value::from(m.to_rows())
}

pub fn view_to_value(v: &RowView<f64>) -> Value {
    Value::from(v.to_vec())
}

pub(crate) fn unexpected(expected: &'static str, value: &Value) -> HostError {
    HostError::type_mismatch(expected, value.kind())
}
