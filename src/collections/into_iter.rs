use core::{fmt, iter::FusedIterator, marker::PhantomData};

use crate::collections::DequeLike;

/// Owning iterator over any deque back-end, draining it from both ends.
#[derive(Clone)]
pub struct IntoIter<T, D> {
    inner: D,
    _marker: PhantomData<T>,
}

impl<T, D> IntoIter<T, D> {
    pub(crate) fn new(inner: D) -> Self {
        IntoIter {
            inner,
            _marker: PhantomData,
        }
    }

    /// The deque holding the elements not yet yielded.
    #[inline]
    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<T, D: fmt::Debug> fmt::Debug for IntoIter<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl<T, D: DequeLike<T>> Iterator for IntoIter<T, D> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }

    #[inline]
    fn count(self) -> usize {
        self.inner.len()
    }

    #[inline]
    fn last(mut self) -> Option<Self::Item> {
        self.inner.pop_back()
    }
}

impl<T, D: DequeLike<T>> DoubleEndedIterator for IntoIter<T, D> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.inner.pop_back()
    }
}

impl<T, D: DequeLike<T>> FusedIterator for IntoIter<T, D> {}

impl<T, D: DequeLike<T>> ExactSizeIterator for IntoIter<T, D> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}
