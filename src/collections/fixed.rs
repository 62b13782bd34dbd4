use core::cmp::Ordering;

use crate::{
    collections::{
        DequeLike,
        ring::{HeapSlots, Ring, empty_slots, ring_backed_deque, try_alloc_slots},
    },
    error::PushError,
};

/// Ring buffer deque with a capacity chosen once, at construction.
///
/// [`destroy`](Self::destroy) releases the buffer; the next push allocates it
/// again with the same capacity.
pub struct FixedDeque<T> {
    ring: Ring<T, HeapSlots<T>>,
    max: usize,
}

impl<T> FixedDeque<T> {
    pub fn with_capacity(max: usize) -> Self {
        Self {
            ring: Ring::new(Box::new_uninit_slice(max)),
            max,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.max
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.len() == self.max
    }

    /// Whether the buffer is currently held. Always `false` for a zero capacity.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.ring.capacity() != 0
    }

    pub fn push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        if let Err(err) = self.ensure_allocated() {
            return Err(PushError::AllocFailed(value, err));
        }
        self.ring.push_front(value).map_err(PushError::Full)
    }

    pub fn push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        if let Err(err) = self.ensure_allocated() {
            return Err(PushError::AllocFailed(value, err));
        }
        self.ring.push_back(value).map_err(PushError::Full)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.ring.clear();
    }

    /// Drops every element and frees the buffer.
    pub fn destroy(&mut self) {
        let released = self.ring.reset_slots(empty_slots());
        trace_event!(capacity = released.len(), "released fixed deque buffer");
        drop(released);
    }

    fn ensure_allocated(&mut self) -> Result<(), std::collections::TryReserveError> {
        if self.is_allocated() || self.max == 0 {
            return Ok(());
        }
        let slots = try_alloc_slots(self.max)?;
        trace_event!(capacity = self.max, "reallocated fixed deque buffer");
        self.ring.reset_slots(slots);
        Ok(())
    }
}

ring_backed_deque!(FixedDeque [] []);

impl<T: Clone> Clone for FixedDeque<T> {
    fn clone(&self) -> Self {
        let slots = if self.is_allocated() {
            Box::new_uninit_slice(self.max)
        } else {
            empty_slots()
        };
        Self {
            ring: Ring::fill(slots, self.iter().cloned()),
            max: self.max,
        }
    }
}

impl<T> DequeLike<T> for FixedDeque<T> {
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
        Self::with_capacity(self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_capacity_boundary() {
        let mut q = FixedDeque::with_capacity(16);
        assert!(q.is_empty());
        for i in 0..15 {
            q.push_back(i).unwrap();
        }
        assert!(!q.is_full());
        q.push_back(15).unwrap();
        assert!(q.is_full());
        assert!(!q.is_empty());
        assert_eq!(q.push_front(16), Err(PushError::Full(16)));
        assert_eq!(q.len(), 16);
    }

    #[test]
    fn t_wraparound_keeps_order() {
        let mut q = FixedDeque::with_capacity(4);
        for i in 0..4 {
            q.push_back(i).unwrap();
        }
        for i in 4..10 {
            assert_eq!(q.pop_front(), Some(i - 4));
            q.push_back(i).unwrap();
        }
        assert_eq!(q, [6, 7, 8, 9]);
        assert_eq!(q.iter().rev().copied().collect::<Vec<_>>(), [9, 8, 7, 6]);
    }

    #[test]
    fn t_destroy_releases_then_reallocates() {
        let mut q = FixedDeque::with_capacity(8);
        q.push_back(String::from("a")).unwrap();
        q.clear();
        assert!(q.is_allocated());
        assert!(q.is_empty());

        q.push_back(String::from("b")).unwrap();
        q.destroy();
        assert!(!q.is_allocated());
        assert!(q.is_empty());
        assert_eq!(q.capacity(), 8);
        assert!(!q.is_full());

        q.push_front(String::from("c")).unwrap();
        assert!(q.is_allocated());
        assert_eq!(q.front().map(String::as_str), Some("c"));
    }

    #[test]
    fn t_zero_capacity_is_always_full() {
        let mut q = FixedDeque::with_capacity(0);
        assert!(q.is_empty());
        assert!(q.is_full());
        assert_eq!(q.push_back(1), Err(PushError::Full(1)));
        assert_eq!(q.pop_back(), None);
    }

    #[test]
    fn t_clone_is_independent() {
        let mut q = FixedDeque::with_capacity(3);
        q.push_back(vec![1]).unwrap();
        q.push_front(vec![0]).unwrap();
        let mut copy = q.clone();
        copy[0].push(9);
        assert_eq!(q, [vec![0], vec![1]]);
        assert_eq!(copy, [vec![0, 9], vec![1]]);
        assert_eq!(copy.capacity(), 3);
    }
}
