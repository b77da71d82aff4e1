//! Data source abstraction
//!
//! The engine only needs integer-indexed reads and a length. Storage
//! (in-memory, memory-mapped, file-backed) lives behind this trait.

use num_traits::Float;

use crate::engine::HierarchicalBuffer;

/// Read-only, integer-indexed array of numbers
pub trait DataSource<T> {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Element at `index`; callers stay within `0..len()`.
    fn value(&self, index: usize) -> T;

    /// Whether the source holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Copy> DataSource<T> for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn value(&self, index: usize) -> T {
        self[index]
    }
}

impl<T: Copy> DataSource<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn value(&self, index: usize) -> T {
        self[index]
    }
}

impl<T, S: DataSource<T> + ?Sized> DataSource<T> for &S {
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn value(&self, index: usize) -> T {
        (**self).value(index)
    }
}

/// A source virtually extended with a fill value
///
/// Lets an arbitrary-length array meet the length constraint without
/// copying it.
#[derive(Debug, Clone)]
pub struct PaddedSource<S, T> {
    inner: S,
    len: usize,
    fill: T,
}

impl<S: DataSource<T>, T: Float> PaddedSource<S, T> {
    /// Pad `inner` with zeros up to `len` (never shorter than `inner`).
    pub fn new(inner: S, len: usize) -> Self {
        Self::with_fill(inner, len, T::zero())
    }

    /// Pad `inner` with `fill` up to `len`.
    pub fn with_fill(inner: S, len: usize, fill: T) -> Self {
        let len = len.max(inner.len());
        Self { inner, len, fill }
    }

    /// Pad with zeros to the smallest length `engine` accepts.
    pub fn for_engine(inner: S, engine: &HierarchicalBuffer<T>) -> Self {
        let len = engine.recommended_padded_length(inner.len().max(engine.min_buildable_len()));
        Self::new(inner, len)
    }

    /// Length of the unpadded source.
    pub fn inner_len(&self) -> usize {
        self.inner.len()
    }

    /// Wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DataSource<T>, T: Float> DataSource<T> for PaddedSource<S, T> {
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn value(&self, index: usize) -> T {
        if index < self.inner.len() {
            self.inner.value(index)
        } else {
            self.fill
        }
    }
}

/// Virtual array whose element `i` is `f(i)`
#[derive(Clone)]
pub struct FnSource<F> {
    len: usize,
    f: F,
}

impl<F> FnSource<F> {
    /// Array of `len` elements computed on demand.
    pub fn new(len: usize, f: F) -> Self {
        Self { len, f }
    }
}

impl<F> std::fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource").field("len", &self.len).finish()
    }
}

impl<T, F: Fn(usize) -> T> DataSource<T> for FnSource<F> {
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn value(&self, index: usize) -> T {
        (self.f)(index)
    }
}
