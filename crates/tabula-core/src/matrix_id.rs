/// Unique identifier for matrix storage.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixId(usize);

impl std::fmt::Debug for MatrixId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "M{}", self.0)
    }
}

impl MatrixId {
    pub(crate) fn new() -> Self {
        use std::sync::atomic;
        static COUNTER: atomic::AtomicUsize = atomic::AtomicUsize::new(1);
        Self(COUNTER.fetch_add(1, atomic::Ordering::Relaxed))
    }
}
