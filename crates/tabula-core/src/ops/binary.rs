use derive_new::new;

use crate::{Enforcer, InvariantError, Matrix, MatrixDType, Operation, Shape};
#[cfg(test)]
use test_strategy::Arbitrary;

#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
}

impl BinaryOp {
    pub fn kernel_operator(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
        }
    }

    pub fn apply<T: MatrixDType>(&self, lhs: T, rhs: T) -> T {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
        }
    }
}

#[inline]
pub(crate) fn binary_map<T: MatrixDType>(lhs: &[T], rhs: &[T], dst: &mut [T], op: BinaryOp) {
    assert_eq!(lhs.len(), dst.len());
    assert_eq!(rhs.len(), dst.len());
    for ((l, r), d) in lhs
        .iter()
        .copied()
        .zip(rhs.iter().copied())
        .zip(dst.iter_mut())
    {
        *d = op.apply(l, r);
    }
}

/// Elementwise binary operation over two matrices of identical shape.
#[derive(new, Debug, Clone)]
pub struct Binary<'a, T: MatrixDType> {
    lhs: &'a Matrix<T>,
    rhs: &'a Matrix<T>,
    op: BinaryOp,
}

impl<T: MatrixDType> Operation<T> for Binary<'_, T> {
    fn check_invariants(&self) -> Result<(), InvariantError> {
        Enforcer::check_shapes_equal(
            self.op.kernel_operator(),
            self.lhs.shape(),
            self.rhs.shape(),
        )
    }

    fn compute_shape(&self) -> Shape {
        *self.lhs.shape()
    }

    fn apply_cpu(&self, dst: &mut [T]) {
        let lhs = self.lhs.storage().read();
        let rhs = self.rhs.storage().read();
        binary_map(lhs.as_slice(), rhs.as_slice(), dst, self.op);
    }
}
