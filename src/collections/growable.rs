use core::{cmp::Ordering, mem::MaybeUninit};
use std::collections::TryReserveError;

use crate::{
    collections::{
        DequeLike,
        ring::{HeapSlots, Ring, empty_slots, physical_ranges, ring_backed_deque, try_alloc_slots},
    },
    error::PushError,
};

/// Ring buffer deque that never reports full: a push into a full buffer first
/// moves the elements into a buffer `INCREMENT` slots larger.
///
/// A new deque holds no buffer until the first push.
pub struct GrowableDeque<T, const INCREMENT: usize = 16> {
    ring: Ring<T, HeapSlots<T>>,
}

impl<T, const INCREMENT: usize> GrowableDeque<T, INCREMENT> {
    #[inline]
    pub fn new() -> Self {
        const { assert!(INCREMENT != 0, "GrowableDeque INCREMENT must be > 0") };
        Self {
            ring: Ring::new(empty_slots()),
        }
    }

    /// Starts with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        const { assert!(INCREMENT != 0, "GrowableDeque INCREMENT must be > 0") };
        Self {
            ring: Ring::new(Box::new_uninit_slice(capacity)),
        }
    }

    /// Number of slots in the current buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        false
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.ring.capacity() != 0
    }

    pub fn push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        if self.ring.is_full() {
            if let Err(err) = self.grow(INCREMENT) {
                return Err(PushError::AllocFailed(value, err));
            }
        }
        self.ring.push_front(value).map_err(PushError::Full)
    }

    pub fn push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        if self.ring.is_full() {
            if let Err(err) = self.grow(INCREMENT) {
                return Err(PushError::AllocFailed(value, err));
            }
        }
        self.ring.push_back(value).map_err(PushError::Full)
    }

    /// Makes room for at least `additional` more elements, growing by whole increments.
    pub fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let capacity = self.ring.capacity();
        let needed = self.ring.len().saturating_add(additional);
        if needed <= capacity {
            return Ok(());
        }
        let increments = (needed - capacity).div_ceil(INCREMENT);
        self.grow(increments.saturating_mul(INCREMENT))
    }

    #[inline]
    pub fn clear(&mut self) {
        self.ring.clear();
    }

    /// Drops every element and frees the buffer, leaving the deque as `new()` made it.
    pub fn destroy(&mut self) {
        let released = self.ring.reset_slots(empty_slots());
        trace_event!(capacity = released.len(), "released growable deque buffer");
        drop(released);
    }

    fn grow(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let old_capacity = self.ring.capacity();
        let new_capacity = old_capacity.saturating_add(additional);
        let slots = match relinearize(
            self.ring.slots(),
            self.ring.head(),
            self.ring.len(),
            new_capacity,
        ) {
            Ok(slots) => slots,
            Err(err) => {
                trace_event!(old_capacity, new_capacity, error = %err, "growable deque allocation failed");
                return Err(err);
            }
        };
        trace_event!(old_capacity, new_capacity, "grew growable deque buffer");
        // SAFETY: `relinearize` moved every element into `slots[..len]` in
        // logical order; the old buffer is dropped as plain `MaybeUninit` slots.
        drop(unsafe { self.ring.replace_slots(slots) });
        Ok(())
    }
}

/// Copies the `len` slots of a ring that starts at `head` in `old` into a new
/// buffer of `new_capacity` slots, in logical order starting at index 0.
///
/// The copy is bitwise. If the slots hold live values, exactly one of the two
/// buffers may be treated as owning them afterwards. Nothing is copied when
/// the allocation fails, so `old` is untouched in that case.
///
/// # Panics
///
/// Panics if `len` exceeds `old.len()` or `new_capacity`, or if `head` is out
/// of bounds for a non-empty run.
pub fn relinearize<T>(
    old: &[MaybeUninit<T>],
    head: usize,
    len: usize,
    new_capacity: usize,
) -> Result<HeapSlots<T>, TryReserveError> {
    assert!(len <= old.len(), "len (is {len}) should be <= old capacity (is {})", old.len());
    assert!(len <= new_capacity, "len (is {len}) should be <= new capacity (is {new_capacity})");
    let (a, b) = physical_ranges(head, len, old.len());
    let (a, b) = (&old[a], &old[b]);

    let mut new = try_alloc_slots(new_capacity)?;
    let dst = new.as_mut_ptr();
    // SAFETY: `a.len() + b.len() == len <= new_capacity`, the two buffers are
    // distinct allocations, and `MaybeUninit` has no validity requirements.
    unsafe {
        core::ptr::copy_nonoverlapping(a.as_ptr(), dst, a.len());
        core::ptr::copy_nonoverlapping(b.as_ptr(), dst.add(a.len()), b.len());
    }
    Ok(new)
}

ring_backed_deque!(GrowableDeque [const INCREMENT: usize] [INCREMENT]);

impl<T, const INCREMENT: usize> Default for GrowableDeque<T, INCREMENT> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const INCREMENT: usize> Clone for GrowableDeque<T, INCREMENT> {
    fn clone(&self) -> Self {
        Self {
            ring: Ring::fill(Box::new_uninit_slice(self.capacity()), self.iter().cloned()),
        }
    }
}

impl<T, const INCREMENT: usize> Extend<T> for GrowableDeque<T, INCREMENT> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        // the hint is advisory; a failed reservation falls back to growing per push.
        self.reserve(iter.size_hint().0).ok();
        for value in iter {
            if let Err(err) = self.push_back(value) {
                panic!("{err}");
            }
        }
    }
}

impl<T, const INCREMENT: usize> FromIterator<T> for GrowableDeque<T, INCREMENT> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut q = Self::new();
        q.extend(iter);
        q
    }
}

impl<T, const N: usize, const INCREMENT: usize> From<[T; N]> for GrowableDeque<T, INCREMENT> {
    fn from(value: [T; N]) -> Self {
        Self::from_iter(value)
    }
}

impl<T, const INCREMENT: usize> DequeLike<T> for GrowableDeque<T, INCREMENT> {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn slots_of(values: &[Option<i32>]) -> Vec<MaybeUninit<i32>> {
        values
            .iter()
            .map(|v| match v {
                Some(v) => MaybeUninit::new(*v),
                None => MaybeUninit::uninit(),
            })
            .collect()
    }

    fn read_prefix(slots: &[MaybeUninit<i32>], len: usize) -> Vec<i32> {
        slots[..len]
            .iter()
            .map(|s| unsafe { s.assume_init_read() })
            .collect()
    }

    #[test]
    fn t_relinearize_wrapped() {
        // logical order 3 4 5 6 starting at physical index 3
        let old = slots_of(&[Some(5), Some(6), None, Some(3), Some(4)]);
        let new = relinearize(&old, 3, 4, 9).unwrap();
        assert_eq!(new.len(), 9);
        assert_eq!(read_prefix(&new, 4), [3, 4, 5, 6]);
    }

    #[test]
    fn t_relinearize_unwrapped_and_empty() {
        let old = slots_of(&[None, Some(1), Some(2), None]);
        let new = relinearize(&old, 1, 2, 4).unwrap();
        assert_eq!(read_prefix(&new, 2), [1, 2]);

        let new = relinearize::<i32>(&[], 0, 0, 16).unwrap();
        assert_eq!(new.len(), 16);
    }

    #[test]
    fn t_relinearize_full_buffer() {
        let old = slots_of(&[Some(2), Some(3), Some(0), Some(1)]);
        let new = relinearize(&old, 2, 4, 8).unwrap();
        assert_eq!(read_prefix(&new, 4), [0, 1, 2, 3]);
    }

    #[test]
    fn t_relinearize_alloc_failure() {
        let old = slots_of(&[Some(1)]);
        assert!(relinearize(&old, 0, 1, usize::MAX).is_err());
    }

    #[test]
    fn t_grows_by_increment() {
        let mut q = GrowableDeque::<i32, 4>::new();
        assert!(!q.is_allocated());
        assert_eq!(q.capacity(), 0);
        q.push_back(0).unwrap();
        assert_eq!(q.capacity(), 4);
        for i in 1..5 {
            q.push_back(i).unwrap();
        }
        assert_eq!(q.capacity(), 8);
        assert!(!q.is_full());
        assert_eq!(q, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn t_grow_while_wrapped() {
        let mut q = GrowableDeque::<i32, 4>::new();
        q.push_back(2).unwrap();
        q.push_back(3).unwrap();
        q.push_front(1).unwrap();
        q.push_front(0).unwrap();
        assert_eq!(q.as_slices(), (&[0, 1][..], &[2, 3][..]));
        q.push_front(-1).unwrap();
        assert_eq!(q.capacity(), 8);
        assert_eq!(q, [-1, 0, 1, 2, 3]);
        q.push_back(4).unwrap();
        assert_eq!(q.back(), Some(&4));
    }

    #[test]
    fn t_reserve_rounds_to_increments() {
        let mut q = GrowableDeque::<u8, 16>::new();
        q.reserve(17).unwrap();
        assert_eq!(q.capacity(), 32);
        q.reserve(3).unwrap();
        assert_eq!(q.capacity(), 32);
        assert!(q.reserve(usize::MAX).is_err());
        assert_eq!(q.capacity(), 32);
    }

    #[test]
    fn t_extend_survives_oversized_hint() {
        struct Overstated(core::ops::Range<u8>);

        impl Iterator for Overstated {
            type Item = u8;

            fn next(&mut self) -> Option<u8> {
                self.0.next()
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                (usize::MAX, None)
            }
        }

        let mut q = GrowableDeque::<u8, 4>::new();
        q.push_back(0).unwrap();
        q.extend(Overstated(1..6));
        assert_eq!(q, [0, 1, 2, 3, 4, 5]);
        assert_eq!(q.capacity(), 8);
    }

    #[test]
    fn t_clear_and_destroy() {
        let mut q: GrowableDeque<String> = ["a", "b"].map(String::from).into();
        q.clear();
        assert!(q.is_empty());
        assert!(q.is_allocated());
        q.push_back(String::from("c")).unwrap();
        q.destroy();
        assert!(q.is_empty());
        assert!(!q.is_allocated());
        assert_eq!(q.capacity(), 0);
    }
}
