use derive_new::new;

use crate::{shape, Enforcer, InvariantError, Matrix, MatrixDType, Operation, Shape};

/// Row-major `(m, k) x (k, n) -> (m, n)` product.
#[inline]
pub(crate) fn gemm_impl<T: MatrixDType>(
    lhs: &[T],
    rhs: &[T],
    dst: &mut [T],
    m: usize,
    k: usize,
    n: usize,
) {
    assert_eq!(lhs.len(), m * k);
    assert_eq!(rhs.len(), k * n);
    assert_eq!(dst.len(), m * n);
    for i in 0..m {
        let lhs_row = &lhs[i * k..(i + 1) * k];
        let dst_row = &mut dst[i * n..(i + 1) * n];
        for (j, d) in dst_row.iter_mut().enumerate() {
            let mut acc = T::zero();
            for (p, &l) in lhs_row.iter().enumerate() {
                acc = acc + l * rhs[p * n + j];
            }
            *d = acc;
        }
    }
}

#[derive(new, Debug, Clone)]
pub struct Matmul<'a, T: MatrixDType> {
    lhs: &'a Matrix<T>,
    rhs: &'a Matrix<T>,
}

impl<T: MatrixDType> Operation<T> for Matmul<'_, T> {
    fn check_invariants(&self) -> Result<(), InvariantError> {
        Enforcer::check_inner_dims("*", self.lhs.shape(), self.rhs.shape())
    }

    fn compute_shape(&self) -> Shape {
        shape![self.lhs.rows(), self.rhs.cols()]
    }

    fn apply_cpu(&self, dst: &mut [T]) {
        let (m, k, n) = (self.lhs.rows(), self.lhs.cols(), self.rhs.cols());
        log::debug!("Matmul m: {m}, k: {k}, n: {n}");
        let lhs = self.lhs.storage().read();
        let rhs = self.rhs.storage().read();
        gemm_impl(lhs.as_slice(), rhs.as_slice(), dst, m, k, n);
    }
}
