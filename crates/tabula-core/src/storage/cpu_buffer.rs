use crate::{storage::allocation_failure, MatrixDType, Shape};

/// Fixed-length row-major payload.
///
/// Sized exactly once at construction and never grown or shrunk afterwards.
#[derive(Clone, PartialEq)]
pub struct CpuBuffer<T: MatrixDType> {
    data: Box<[T]>,
}

impl<T: MatrixDType> CpuBuffer<T> {
    /// Reserves room for `shape.numel()` elements, aborting if that fails.
    pub(crate) fn reserve(shape: &Shape) -> Vec<T> {
        let numel = shape
            .checked_numel()
            .unwrap_or_else(|| allocation_failure::<T>(shape));
        let mut data = Vec::new();
        if data.try_reserve_exact(numel).is_err() {
            allocation_failure::<T>(shape);
        }
        data
    }

    pub fn zeros(shape: &Shape) -> Self {
        let mut data = Self::reserve(shape);
        data.resize(shape.numel(), T::zero());
        Self::from(data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }

    pub fn dump(&self, full: bool) -> String {
        let length = if self.data.len() < 16 {
            self.data.len()
        } else {
            16
        };
        if full || length == self.data.len() {
            format!("{:?}", self.as_slice())
        } else {
            format!(
                "{:?}...{:?}",
                &self.data[..length],
                &self.data[self.data.len() - length..]
            )
        }
    }
}

impl<T: MatrixDType> From<Vec<T>> for CpuBuffer<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            data: data.into_boxed_slice(),
        }
    }
}

impl<T: MatrixDType> std::fmt::Debug for CpuBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBuffer")
            .field("len", &self.len())
            .field("data", &self.dump(false))
            .finish()
    }
}

impl<T: MatrixDType> std::ops::Index<usize> for CpuBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T: MatrixDType> std::ops::IndexMut<usize> for CpuBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::CpuBuffer;
    use crate::shape;

    #[test]
    fn test_zeros() {
        let buf = CpuBuffer::<f64>::zeros(&shape![3, 2]);
        assert_eq!(buf.len(), 6);
        assert!(buf.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_dump_truncates() {
        let buf = CpuBuffer::from((0..40).collect::<Vec<i32>>());
        let dump = buf.dump(false);
        assert!(dump.contains("..."));
        assert!(dump.starts_with("[0, 1"));
        assert!(dump.ends_with("38, 39]"));
        assert!(!buf.dump(true).contains("..."));
    }
}
