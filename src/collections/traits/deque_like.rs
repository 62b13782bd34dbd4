use core::cmp::Ordering;
use std::collections::VecDeque;

use crate::{collections::ContainerCommon, error::PushError, sort};

/// The operation set every deque back-end shares.
///
/// Element copying and destruction go through `Clone` and `Drop`; the `*_with`
/// methods additionally run a caller hook on each element first.
pub trait DequeLike<T>: ContainerCommon + Sized {
    fn push_front(&mut self, value: T) -> Result<(), PushError<T>>;

    fn push_back(&mut self, value: T) -> Result<(), PushError<T>>;

    fn pop_front(&mut self) -> Option<T>;

    fn pop_back(&mut self) -> Option<T>;

    fn front(&self) -> Option<&T>;

    fn front_mut(&mut self) -> Option<&mut T>;

    fn back(&self) -> Option<&T>;

    fn back_mut(&mut self) -> Option<&mut T>;

    /// Visits every element exactly once, front to back.
    fn for_each(&self, f: impl FnMut(&T));

    /// Visits every element exactly once, front to back.
    fn for_each_mut(&mut self, f: impl FnMut(&mut T));

    /// Visits every element exactly once, back to front.
    fn rev_for_each_mut(&mut self, f: impl FnMut(&mut T));

    /// Exposes the whole sequence as one slice and lets `sort` reorder it
    /// with `compare`. The result is stable only if `sort` is.
    fn sort_with<S, C>(&mut self, sort: S, compare: C)
    where
        S: FnOnce(&mut [T], &mut C),
        C: FnMut(&T, &T) -> Ordering;

    /// Drops every element but keeps the backing storage.
    fn clear(&mut self);

    /// Drops every element and releases the backing storage.
    fn destroy(&mut self);

    /// Whether backing storage is currently held.
    fn is_allocated(&self) -> bool;

    /// A new, empty deque of the same kind and capacity.
    fn empty_like(&self) -> Self;

    /// Stable sort by `compare`.
    #[inline]
    fn sort_by<C>(&mut self, compare: C)
    where
        C: FnMut(&T, &T) -> Ordering,
    {
        self.sort_with(sort::merge_sort, compare);
    }

    /// Builds an independent deque holding `copy(e)` for every element `e`, in order.
    fn copy_with<F>(&self, mut copy: F) -> Result<Self, PushError<T>>
    where
        F: FnMut(&T) -> T,
    {
        let mut copied = self.empty_like();
        let mut result = Ok(());
        self.for_each(|x| {
            if result.is_ok() {
                result = copied.push_back(copy(x));
            }
        });
        result.map(|()| copied)
    }

    /// Runs `destroy` on every element front to back, then drops them and
    /// releases the backing storage.
    fn destroy_with<F>(&mut self, destroy: F)
    where
        F: FnMut(&mut T),
    {
        self.for_each_mut(destroy);
        self.destroy();
    }

    /// Runs `destroy` on every element front to back, then drops them while
    /// keeping the backing storage.
    fn clear_with<F>(&mut self, destroy: F)
    where
        F: FnMut(&mut T),
    {
        self.for_each_mut(destroy);
        self.clear();
    }
}

impl<T> DequeLike<T> for VecDeque<T> {
    #[inline]
    fn push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        self.push_front(value);
        Ok(())
    }

    #[inline]
    fn push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        self.push_back(value);
        Ok(())
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
        self.iter_mut().for_each(f);
    }

    #[inline]
    fn rev_for_each_mut(&mut self, f: impl FnMut(&mut T)) {
        self.iter_mut().rev().for_each(f);
    }

    fn sort_with<S, C>(&mut self, sort: S, mut compare: C)
    where
        S: FnOnce(&mut [T], &mut C),
        C: FnMut(&T, &T) -> Ordering,
    {
        sort(self.make_contiguous(), &mut compare);
    }

    #[inline]
    fn clear(&mut self) {
        self.clear();
    }

    #[inline]
    fn destroy(&mut self) {
        *self = VecDeque::new();
    }

    #[inline]
    fn is_allocated(&self) -> bool {
        self.capacity() != 0
    }

    #[inline]
    fn empty_like(&self) -> Self {
        VecDeque::with_capacity(self.len())
    }
}
