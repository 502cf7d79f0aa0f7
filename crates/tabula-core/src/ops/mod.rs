mod binary;
mod matmul;

pub use binary::*;
pub use matmul::*;

use crate::{storage::CpuBuffer, InvariantError, Matrix, MatrixDType, Shape};
use std::fmt::Debug;

/// # Operation
///
/// An operation consumes one or more matrices and produces a freshly
/// allocated result. Nothing is allocated until every invariant has been
/// checked.
pub trait Operation<T: MatrixDType>: Debug {
    /// # Check Invariants
    ///
    /// Shape requirements on the operands. A failure here leaves every operand
    /// untouched.
    fn check_invariants(&self) -> Result<(), InvariantError>;

    /// # Compute Shape
    ///
    /// Shape of the result, assuming the invariants hold.
    fn compute_shape(&self) -> Shape;

    /// Writes the result into `dst`, which holds `compute_shape().numel()`
    /// zeroed elements.
    fn apply_cpu(&self, dst: &mut [T]);
}

/// Checks, allocates, then runs `op`.
pub fn execute<T: MatrixDType, O: Operation<T>>(op: &O) -> Result<Matrix<T>, InvariantError> {
    op.check_invariants()?;
    let shape = op.compute_shape();
    let mut dst = CpuBuffer::zeros(&shape);
    op.apply_cpu(dst.as_mut_slice());
    log::trace!("Executed {:?} -> {:?}", op, shape);
    Ok(Matrix::from_buffer(shape, dst))
}
