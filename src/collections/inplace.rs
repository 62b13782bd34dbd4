use core::{cmp::Ordering, mem::MaybeUninit};

use crate::{
    collections::{
        DequeLike,
        ring::{Ring, ring_backed_deque},
    },
    error::PushError,
};

/// Ring buffer deque whose `N` slots live inline, so the capacity is fixed
/// at build time and no heap allocation ever happens.
pub struct InplaceDeque<T, const N: usize> {
    ring: Ring<T, [MaybeUninit<T>; N]>,
}

impl<T, const N: usize> InplaceDeque<T, N> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            ring: Ring::new([const { MaybeUninit::uninit() }; N]),
        }
    }

    /// `Self::new()` with "power of 2" capacity assertion.
    ///
    /// # See also
    ///
    /// [`assert_pow2_capacity`](Self::assert_pow2_capacity)
    #[inline]
    pub const fn with_pow2_capacity() -> Self
    where
        IsPow2Usize<N>: crate::assert::True,
    {
        Self::new()
    }

    /// assert `self.capacity()` is power of 2 in compile time.
    #[inline(always)]
    pub const fn assert_pow2_capacity(&self)
    where
        IsPow2Usize<N>: crate::assert::True,
    {
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.len() == N
    }

    pub fn push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        self.ring.push_front(value).map_err(PushError::Full)
    }

    pub fn push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        self.ring.push_back(value).map_err(PushError::Full)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.ring.clear();
    }

    /// Inline storage cannot be released, so this is the same as [`clear`](Self::clear).
    #[inline]
    pub fn destroy(&mut self) {
        self.ring.clear();
    }

    #[inline]
    pub const fn is_allocated(&self) -> bool {
        true
    }
}

ring_backed_deque!(InplaceDeque [const N: usize] [N]);

impl<T, const N: usize> Default for InplaceDeque<T, N> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const N: usize> Clone for InplaceDeque<T, N> {
    #[inline]
    fn clone(&self) -> Self {
        Self::from_iter(self.iter().cloned())
    }
}

/// Takes at most `N` items; the rest of the iterator is left unconsumed.
impl<T, const N: usize> FromIterator<T> for InplaceDeque<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            ring: Ring::fill([const { MaybeUninit::uninit() }; N], iter),
        }
    }
}

impl<T, const N: usize> From<[T; N]> for InplaceDeque<T, N> {
    fn from(value: [T; N]) -> Self {
        Self::from_iter(value)
    }
}

impl<T, const N: usize> DequeLike<T> for InplaceDeque<T, N> {
    #[inline]
    fn push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        self.push_front(value)
    }

    #[inline]
    fn push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        self.push_back(value)
    }

    #[inline]
    fn pop_front(&mut self) -> Option<T> {
        self.pop_front()
    }

    #[inline]
    fn pop_back(&mut self) -> Option<T> {
        self.pop_back()
    }

    #[inline]
    fn front(&self) -> Option<&T> {
        self.front()
    }

    #[inline]
    fn front_mut(&mut self) -> Option<&mut T> {
        self.front_mut()
    }

    #[inline]
    fn back(&self) -> Option<&T> {
        self.back()
    }

    #[inline]
    fn back_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }

    #[inline]
    fn for_each(&self, f: impl FnMut(&T)) {
        self.iter().for_each(f);
    }

    #[inline]
    fn for_each_mut(&mut self, f: impl FnMut(&mut T)) {
        self.for_each_mut(f);
    }

    #[inline]
    fn rev_for_each_mut(&mut self, f: impl FnMut(&mut T)) {
        self.rev_for_each_mut(f);
    }

    #[inline]
    fn sort_with<S, C>(&mut self, sort: S, compare: C)
    where
        S: FnOnce(&mut [T], &mut C),
        C: FnMut(&T, &T) -> Ordering,
    {
        self.sort_with(sort, compare);
    }

    #[inline]
    fn clear(&mut self) {
        self.clear();
    }

    #[inline]
    fn destroy(&mut self) {
        self.destroy();
    }

    #[inline]
    fn is_allocated(&self) -> bool {
        self.is_allocated()
    }

    #[inline]
    fn empty_like(&self) -> Self {
        Self::new()
    }
}

pub struct IsPow2Usize<const VALUE: usize>(());

macro_rules! is_pow2_impl {
    ($($n: literal),* $(,)?) => {
        $(
            impl $crate::assert::True for IsPow2Usize<{ 1 << $n }> {}
        )*
    };
}

is_pow2_impl!(
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25,
    26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48,
    49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_new() {
        let q = InplaceDeque::<i32, 128>::new();
        q.assert_pow2_capacity();
        let _q = InplaceDeque::<i32, 64>::with_pow2_capacity();
        assert_eq!(q.capacity(), 128);
        assert!(q.is_empty());
        assert!(q.is_allocated());
    }

    #[test]
    fn t_capacity_boundary() {
        let mut q = InplaceDeque::<i32, 16>::new();
        for i in 0..15 {
            q.push_back(i).unwrap();
            assert!(!q.is_full());
        }
        q.push_front(-1).unwrap();
        assert!(q.is_full());
        assert_eq!(q.push_back(99), Err(PushError::Full(99)));
        assert_eq!(q.push_front(98), Err(PushError::Full(98)));
        assert_eq!(q.len(), 16);
        assert_eq!(q.front(), Some(&-1));
        assert_eq!(q.back(), Some(&14));
    }

    #[test]
    fn t_from_iter_stops_at_capacity() {
        let mut source = 0..10;
        let q: InplaceDeque<i32, 4> = source.by_ref().collect();
        assert_eq!(q, [0, 1, 2, 3]);
        assert_eq!(source.next(), Some(4));
    }

    #[test]
    fn t_destroy_keeps_inline_storage() {
        let mut q = InplaceDeque::from([1, 2, 3]);
        DequeLike::destroy(&mut q);
        assert!(q.is_empty());
        assert!(q.is_allocated());
        q.push_back(4).unwrap();
        assert_eq!(q, [4]);
    }
}
