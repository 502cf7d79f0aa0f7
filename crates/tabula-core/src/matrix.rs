use crate::{
    ops::{self, Binary, BinaryOp, Matmul},
    CpuBuffer, DType, Enforcer, InvariantError, MatrixDType, MatrixId, RowView, Shape, Storage,
};

use std::sync::Arc;

/// A dense, row-major matrix.
///
/// `Matrix` is a handle: cloning it is cheap and every clone refers to the
/// same storage. Rows and columns are fixed at construction. Element writes
/// go through `&self`, since row views alias the same payload.
#[derive(Clone)]
pub struct Matrix<T: MatrixDType> {
    inner: Arc<Inner<T>>,
}

/// Shape header and payload, allocated together behind one `Arc`.
#[derive(Debug)]
pub struct Inner<T: MatrixDType> {
    id: MatrixId,
    shape: Shape,
    storage: Storage<T>,
}

impl<T: MatrixDType> std::ops::Deref for Matrix<T> {
    type Target = Inner<T>;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl<T: MatrixDType> std::fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matrix")
            .field("id", &self.id)
            .field("shape", &self.shape)
            .field("dt", &self.dt())
            .field("storage", &self.storage.dump(false))
            .finish()
    }
}

impl<T: MatrixDType> Matrix<T> {
    pub(crate) fn from_buffer(shape: Shape, buffer: CpuBuffer<T>) -> Self {
        debug_assert_eq!(shape.numel(), buffer.len());
        Self::from_storage(shape, Storage::new(buffer))
    }

    fn from_storage(shape: Shape, storage: Storage<T>) -> Self {
        let id = MatrixId::new();
        log::debug!("Allocated {:?} {:?} {}", id, shape, T::dt());
        Self {
            inner: Arc::new(Inner { id, shape, storage }),
        }
    }

    /// Creates a `rows` x `cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, InvariantError> {
        let shape = Enforcer::check_dimensions(rows, cols)?;
        Ok(Self::from_storage(shape, Storage::zeros(&shape)))
    }

    /// Creates a 1 x N row vector.
    pub fn from_vec(data: Vec<T>) -> Result<Self, InvariantError> {
        let shape = Enforcer::check_dimensions(1, data.len())?;
        Ok(Self::from_buffer(shape, data.into()))
    }

    /// Creates a matrix from row-major data with an explicit shape.
    pub fn from_data(data: Vec<T>, shape: Shape) -> Result<Self, InvariantError> {
        Enforcer::check_data_len(&shape, data.len())?;
        Ok(Self::from_buffer(shape, data.into()))
    }

    /// Creates a matrix from nested rows.
    ///
    /// The first row fixes the column count; any other row of a different
    /// length is rejected before anything is allocated.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, InvariantError> {
        let shape = Enforcer::check_rows(rows)?;
        let mut data = CpuBuffer::reserve(&shape);
        for row in rows {
            data.extend_from_slice(row.as_ref());
        }
        Ok(Self::from_buffer(shape, data.into()))
    }

    pub fn id(&self) -> MatrixId {
        self.id
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    pub fn cols(&self) -> usize {
        self.shape.cols()
    }

    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    pub fn dt(&self) -> DType {
        T::dt()
    }

    pub(crate) fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    #[track_caller]
    fn check_bounds(&self, i: usize, j: usize) {
        assert!(
            i < self.rows() && j < self.cols(),
            "index ({i}, {j}) out of bounds for {:?}",
            self.shape
        );
    }

    /// Reads `(i, j)`, 0-based. Panics if out of bounds.
    #[inline]
    pub fn peek(&self, i: usize, j: usize) -> T {
        self.check_bounds(i, j);
        self.storage.read()[self.shape.offset(i, j)]
    }

    /// Writes `(i, j)`, 0-based. Panics if out of bounds.
    #[inline]
    pub fn poke(&self, i: usize, j: usize, value: T) {
        self.check_bounds(i, j);
        self.storage.write()[self.shape.offset(i, j)] = value;
    }

    /// Reads `(i, j)`, 0-based, or `None` if out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        (i < self.rows() && j < self.cols()).then(|| self.peek(i, j))
    }

    /// Writes `(i, j)`, 0-based, returning the previous value, or `None`
    /// without writing if out of bounds.
    pub fn set(&self, i: usize, j: usize, value: T) -> Option<T> {
        if i >= self.rows() || j >= self.cols() {
            return None;
        }
        let offset = self.shape.offset(i, j);
        let mut buffer = self.storage.write();
        Some(std::mem::replace(&mut buffer[offset], value))
    }

    /// A view of row `r`, counted from 1.
    pub fn row(&self, r: i64) -> Result<RowView<T>, InvariantError> {
        let row = Enforcer::resolve_index(r, self.rows())?;
        Ok(RowView::new(self.clone(), row))
    }

    /// A view of row `i`, counted from 0, or `None` if out of bounds.
    pub fn row_at(&self, i: usize) -> Option<RowView<T>> {
        (i < self.rows()).then(|| RowView::new(self.clone(), i))
    }

    /// Elementwise sum. Shapes must match exactly.
    pub fn add(&self, other: &Matrix<T>) -> Result<Matrix<T>, InvariantError> {
        ops::execute(&Binary::new(self, other, BinaryOp::Add))
    }

    /// Elementwise difference. Shapes must match exactly.
    pub fn sub(&self, other: &Matrix<T>) -> Result<Matrix<T>, InvariantError> {
        ops::execute(&Binary::new(self, other, BinaryOp::Sub))
    }

    /// Matrix product. `self.cols()` must equal `other.rows()`.
    pub fn matmul(&self, other: &Matrix<T>) -> Result<Matrix<T>, InvariantError> {
        ops::execute(&Matmul::new(self, other))
    }

    /// Row-major copy of the payload.
    pub fn to_vec(&self) -> Vec<T> {
        self.storage.read().to_vec()
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        let buffer = self.storage.read();
        buffer
            .as_slice()
            .chunks(self.cols())
            .map(<[T]>::to_vec)
            .collect()
    }

    /// A new matrix with a copy of this one's payload. Views of `self` do not
    /// alias the copy.
    pub fn deep_clone(&self) -> Matrix<T> {
        Self::from_storage(self.shape, self.storage.deep_clone())
    }

    /// Whether both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &Matrix<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of live handles (matrices and views) sharing this storage.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T: MatrixDType> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.shape == other.shape
                && self.storage.read().as_slice() == other.storage.read().as_slice())
    }
}
