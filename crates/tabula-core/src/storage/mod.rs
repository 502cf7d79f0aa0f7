mod cpu_buffer;

pub use cpu_buffer::*;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{MatrixDType, Shape};

/// Shared payload of a matrix.
///
/// The owning [`Matrix`](crate::Matrix) and every [`RowView`](crate::RowView)
/// into it read and write through the same lock, so a write through any alias
/// is visible through all of them. Guards never outlive a single operation.
#[derive(Debug)]
pub struct Storage<T: MatrixDType> {
    inner: RwLock<CpuBuffer<T>>,
}

impl<T: MatrixDType> Storage<T> {
    pub fn new(buffer: CpuBuffer<T>) -> Self {
        Self {
            inner: RwLock::new(buffer),
        }
    }

    pub fn zeros(shape: &Shape) -> Self {
        Self::new(CpuBuffer::zeros(shape))
    }

    /// Recursive so that `a.add(&a)` can hold two read guards on one buffer.
    pub fn read(&self) -> RwLockReadGuard<'_, CpuBuffer<T>> {
        self.inner.read_recursive()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, CpuBuffer<T>> {
        self.inner.write()
    }

    pub fn deep_clone(&self) -> Self {
        Self::new(self.read().clone())
    }

    pub fn dump(&self, full: bool) -> String {
        self.read().dump(full)
    }
}

/// Out-of-memory has no recovery path: log and abort the process.
#[cold]
pub fn allocation_failure<T>(shape: &Shape) -> ! {
    log::error!(
        "Failed to allocate storage for {:?} matrix of {}",
        shape,
        std::any::type_name::<T>()
    );
    match shape.checked_numel().map(std::alloc::Layout::array::<T>) {
        Some(Ok(layout)) => std::alloc::handle_alloc_error(layout),
        _ => std::process::abort(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape;

    #[test]
    fn test_writes_visible_to_readers() {
        let storage = Storage::<i32>::zeros(&shape![2, 2]);
        storage.write()[3] = 7;
        assert_eq!(storage.read()[3], 7);
    }

    #[test]
    fn test_recursive_reads() {
        let storage = Storage::<f32>::zeros(&shape![1, 4]);
        let a = storage.read();
        let b = storage.read();
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_deep_clone_is_detached() {
        let storage = Storage::<i64>::zeros(&shape![1, 2]);
        let copy = storage.deep_clone();
        storage.write()[0] = 9;
        assert_eq!(copy.read()[0], 0);
    }
}
