pub mod iter;

use core::{
    marker::PhantomData,
    mem::{self, MaybeUninit},
    ops::Range,
    ptr,
};
use std::collections::TryReserveError;

pub use iter::{Iter, IterMut};

/// Storage a [`Ring`] keeps its elements in.
///
/// Implemented for inline arrays (capacity fixed at build time) and for boxed
/// slices (capacity chosen at runtime).
pub trait Slots<T> {
    fn slots(&self) -> &[MaybeUninit<T>];

    fn slots_mut(&mut self) -> &mut [MaybeUninit<T>];
}

impl<T, const N: usize> Slots<T> for [MaybeUninit<T>; N] {
    #[inline]
    fn slots(&self) -> &[MaybeUninit<T>] {
        self
    }

    #[inline]
    fn slots_mut(&mut self) -> &mut [MaybeUninit<T>] {
        self
    }
}

impl<T> Slots<T> for Box<[MaybeUninit<T>]> {
    #[inline]
    fn slots(&self) -> &[MaybeUninit<T>] {
        self
    }

    #[inline]
    fn slots_mut(&mut self) -> &mut [MaybeUninit<T>] {
        self
    }
}

pub type HeapSlots<T> = Box<[MaybeUninit<T>]>;

/// A zero-length slot buffer. Does not allocate.
#[inline]
pub fn empty_slots<T>() -> HeapSlots<T> {
    Vec::new().into_boxed_slice()
}

/// Allocates `capacity` uninitialized slots, reporting failure instead of aborting.
pub fn try_alloc_slots<T>(capacity: usize) -> Result<HeapSlots<T>, TryReserveError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, MaybeUninit::uninit);
    Ok(slots.into_boxed_slice())
}

/// # Safety
///
/// Every slot in `slots` must be initialized.
#[inline]
pub(crate) unsafe fn assume_init_slice<T>(slots: &[MaybeUninit<T>]) -> &[T] {
    unsafe { &*(slots as *const [MaybeUninit<T>] as *const [T]) }
}

/// # Safety
///
/// Every slot in `slots` must be initialized.
#[inline]
pub(crate) unsafe fn assume_init_slice_mut<T>(slots: &mut [MaybeUninit<T>]) -> &mut [T] {
    unsafe { &mut *(slots as *mut [MaybeUninit<T>] as *mut [T]) }
}

/// Circular buffer core shared by every array-backed deque.
///
/// The live elements occupy `len` slots starting at physical index `head`,
/// wrapping past the end of the storage back to index 0.
pub struct Ring<T, S: Slots<T>> {
    buf: S,
    head: usize,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T, S: Slots<T>> Ring<T, S> {
    #[inline]
    pub const fn new(buf: S) -> Self {
        Self {
            buf,
            head: 0,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Moves items from `iter` into `buf`, stopping once every slot is taken.
    pub fn fill<I: IntoIterator<Item = T>>(mut buf: S, iter: I) -> Self {
        let len = buf
            .slots_mut()
            .iter_mut()
            .zip(iter)
            .map(|(dst, src)| dst.write(src))
            .count();
        Self {
            buf,
            head: 0,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.slots().len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline]
    pub fn slots(&self) -> &[MaybeUninit<T>] {
        self.buf.slots()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let index = self.to_physical_index(index);
        Some(unsafe { self.buf.slots().get_unchecked(index).assume_init_ref() })
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let index = self.to_physical_index(index);
        Some(unsafe { self.buf.slots_mut().get_unchecked_mut(index).assume_init_mut() })
    }

    pub fn swap(&mut self, i: usize, j: usize) -> Result<(), Box<str>> {
        let len = self.len;
        if i >= len {
            let err = format!("swap i (is {i}) should be < len (is {len})");
            return Err(err.into_boxed_str());
        }
        if j >= len {
            let err = format!("swap j (is {j}) should be < len (is {len})");
            return Err(err.into_boxed_str());
        }
        let index_i = self.to_physical_index(i);
        let index_j = self.to_physical_index(j);
        self.buf.slots_mut().swap(index_i, index_j);
        Ok(())
    }

    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.get(self.len.wrapping_sub(1))
    }

    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.len.wrapping_sub(1))
    }

    /// Hands `value` back when every slot is taken.
    pub fn push_front(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        self.head = self.wrap_sub(self.head, 1);
        let head = self.head;
        unsafe { self.buf.slots_mut().get_unchecked_mut(head) }.write(value);
        self.len += 1;
        Ok(())
    }

    /// Hands `value` back when every slot is taken.
    pub fn push_back(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        let index = self.to_physical_index(self.len);
        unsafe { self.buf.slots_mut().get_unchecked_mut(index) }.write(value);
        self.len += 1;
        Ok(())
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let old_head = self.head;
        self.head = self.to_physical_index(1);
        self.len -= 1;
        Some(unsafe { self.buf.slots().get_unchecked(old_head).assume_init_read() })
    }

    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.len -= 1;
        let old_tail = self.to_physical_index(self.len);
        Some(unsafe { self.buf.slots().get_unchecked(old_tail).assume_init_read() })
    }

    pub fn truncate(&mut self, len: usize) {
        /// Runs the destructor for all items in the slice when it gets dropped (normally or
        /// during unwinding).
        struct Dropper<'a, T>(&'a mut [T]);
        impl<T> Drop for Dropper<'_, T> {
            fn drop(&mut self) {
                unsafe { ptr::drop_in_place(self.0) };
            }
        }

        if len >= self.len {
            return;
        }

        // `len` is lowered before any destructor runs, so a panicking destructor
        // can never cause an element to be dropped twice.
        let (front, back) = self.as_mut_slices();
        if len > front.len() {
            let begin = len - front.len();
            let drop_back = &mut back[begin..] as *mut [T];
            self.len = len;
            unsafe { ptr::drop_in_place(drop_back) };
        } else {
            let drop_back = back as *mut [T];
            let drop_front = &mut front[len..] as *mut [T];
            self.len = len;

            // Make sure the second half is dropped even when a destructor
            // in the first one panics.
            let _back_dropper = Dropper(unsafe { &mut *drop_back });
            unsafe { ptr::drop_in_place(drop_front) };
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
        self.head = 0;
    }

    /// Drops every element and swaps in new (empty) storage, returning the old one.
    pub fn reset_slots(&mut self, buf: S) -> S {
        self.clear();
        mem::replace(&mut self.buf, buf)
    }

    /// Swaps in storage that already holds the elements at `0..len`, in order.
    ///
    /// # Safety
    ///
    /// `buf[..self.len()]` must be initialized with this ring's elements in
    /// logical order, and the returned storage must be treated as uninitialized.
    pub unsafe fn replace_slots(&mut self, buf: S) -> S {
        debug_assert!(self.len <= buf.slots().len());
        self.head = 0;
        mem::replace(&mut self.buf, buf)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        let (a, b) = self.as_slices();
        Iter::new(a.iter(), b.iter())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (a, b) = self.as_mut_slices();
        IterMut::new(a.iter_mut(), b.iter_mut())
    }

    #[inline]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (a_range, b_range) = self.slice_ranges();
        let slots = self.buf.slots();
        // SAFETY: `slice_ranges` covers exactly the initialized slots.
        unsafe {
            (
                assume_init_slice(&slots[a_range]),
                assume_init_slice(&slots[b_range]),
            )
        }
    }

    #[inline]
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (a_range, b_range) = self.slice_ranges();
        // the wrapped part always lies entirely below `head`.
        let (low, high) = self.buf.slots_mut().split_at_mut(a_range.start);
        let a = &mut high[..a_range.end - a_range.start];
        let b = &mut low[b_range];
        // SAFETY: `slice_ranges` covers exactly the initialized slots.
        unsafe { (assume_init_slice_mut(a), assume_init_slice_mut(b)) }
    }

    /// Rotates the storage so the elements sit in one slice, and returns it.
    pub fn make_contiguous(&mut self) -> &mut [T] {
        if !self.is_contiguous() {
            // whole-buffer rotation moves slots bitwise, initialized or not.
            let head = self.head;
            self.buf.slots_mut().rotate_left(head);
            self.head = 0;
        }
        let range = self.head..self.head + self.len;
        unsafe { assume_init_slice_mut(&mut self.buf.slots_mut()[range]) }
    }

    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        let (a, b) = self.as_slices();
        a.contains(x) || b.contains(x)
    }

    #[inline]
    pub fn for_each_mut<F: FnMut(&mut T)>(&mut self, f: F) {
        self.iter_mut().for_each(f);
    }

    #[inline]
    pub fn rev_for_each_mut<F: FnMut(&mut T)>(&mut self, f: F) {
        self.iter_mut().rev().for_each(f);
    }
}

impl<T, S: Slots<T>> Ring<T, S> {
    #[inline]
    fn to_physical_index(&self, index: usize) -> usize {
        self.wrap_add(self.head, index)
    }

    #[inline]
    fn wrap_add(&self, index: usize, addend: usize) -> usize {
        wrap_index(index.wrapping_add(addend), self.capacity())
    }

    #[inline]
    fn wrap_sub(&self, index: usize, subtrahend: usize) -> usize {
        wrap_index(
            index.wrapping_sub(subtrahend).wrapping_add(self.capacity()),
            self.capacity(),
        )
    }

    #[inline]
    fn is_contiguous(&self) -> bool {
        self.head <= self.capacity() - self.len
    }

    fn slice_ranges(&self) -> (Range<usize>, Range<usize>) {
        physical_ranges(self.head, self.len, self.capacity())
    }
}

impl<T, S: Slots<T>> Drop for Ring<T, S> {
    fn drop(&mut self) {
        self.truncate(0);
    }
}

/// Splits the logical run `head..head + len` of a ring of `capacity` slots into
/// the part before the physical end and the part that wrapped to index 0.
pub fn physical_ranges(head: usize, len: usize, capacity: usize) -> (Range<usize>, Range<usize>) {
    if len == 0 {
        return (0..0, 0..0);
    }
    debug_assert!(head < capacity && len <= capacity);
    let head_len = capacity - head;
    if head_len >= len {
        (head..head + len, 0..0)
    } else {
        (head..capacity, 0..len - head_len)
    }
}

#[inline]
fn wrap_index(logical_index: usize, capacity: usize) -> usize {
    debug_assert!(
        (logical_index == 0 && capacity == 0)
            || logical_index < capacity
            || (logical_index - capacity) < capacity
    );
    if capacity.is_power_of_two() {
        return logical_index & (capacity - 1);
    }
    if logical_index >= capacity {
        logical_index - capacity
    } else {
        logical_index
    }
}

/// Inherent accessors and standard trait impls shared by every ring-backed deque.
///
/// The deque type must hold its [`Ring`] in a field named `ring`.
macro_rules! ring_backed_deque {
    ($name:ident [$($gen:tt)*] [$($args:tt)*]) => {
        impl<T, $($gen)*> $name<T, $($args)*> {
            #[inline]
            pub fn len(&self) -> usize {
                self.ring.len()
            }

            #[inline]
            pub fn is_empty(&self) -> bool {
                self.ring.is_empty()
            }

            #[inline]
            pub fn get(&self, index: usize) -> Option<&T> {
                self.ring.get(index)
            }

            #[inline]
            pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
                self.ring.get_mut(index)
            }

            #[inline]
            pub fn swap(&mut self, i: usize, j: usize) -> Result<(), Box<str>> {
                self.ring.swap(i, j)
            }

            #[inline]
            pub fn front(&self) -> Option<&T> {
                self.ring.front()
            }

            #[inline]
            pub fn front_mut(&mut self) -> Option<&mut T> {
                self.ring.front_mut()
            }

            #[inline]
            pub fn back(&self) -> Option<&T> {
                self.ring.back()
            }

            #[inline]
            pub fn back_mut(&mut self) -> Option<&mut T> {
                self.ring.back_mut()
            }

            #[inline]
            pub fn pop_front(&mut self) -> Option<T> {
                self.ring.pop_front()
            }

            #[inline]
            pub fn pop_back(&mut self) -> Option<T> {
                self.ring.pop_back()
            }

            #[inline]
            pub fn truncate(&mut self, len: usize) {
                self.ring.truncate(len);
            }

            #[inline]
            pub fn iter(&self) -> $crate::collections::ring::Iter<'_, T> {
                self.ring.iter()
            }

            #[inline]
            pub fn iter_mut(&mut self) -> $crate::collections::ring::IterMut<'_, T> {
                self.ring.iter_mut()
            }

            #[inline]
            pub fn as_slices(&self) -> (&[T], &[T]) {
                self.ring.as_slices()
            }

            #[inline]
            pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
                self.ring.as_mut_slices()
            }

            #[inline]
            pub fn make_contiguous(&mut self) -> &mut [T] {
                self.ring.make_contiguous()
            }

            #[inline]
            pub fn contains(&self, x: &T) -> bool
            where
                T: PartialEq<T>,
            {
                self.ring.contains(x)
            }

            /// Visits every element front to back.
            #[inline]
            pub fn for_each_mut<F: FnMut(&mut T)>(&mut self, f: F) {
                self.ring.for_each_mut(f);
            }

            /// Visits every element back to front.
            #[inline]
            pub fn rev_for_each_mut<F: FnMut(&mut T)>(&mut self, f: F) {
                self.ring.rev_for_each_mut(f);
            }

            /// Linearizes the buffer in place and hands it to `sort` together with `compare`.
            pub fn sort_with<S, C>(&mut self, sort: S, mut compare: C)
            where
                S: FnOnce(&mut [T], &mut C),
                C: FnMut(&T, &T) -> ::core::cmp::Ordering,
            {
                sort(self.ring.make_contiguous(), &mut compare);
            }
        }

        impl<T, $($gen)*> $crate::collections::ContainerCommon for $name<T, $($args)*> {
            #[inline]
            fn len(&self) -> usize {
                self.len()
            }

            #[inline]
            fn capacity(&self) -> usize {
                self.capacity()
            }

            #[inline]
            fn is_empty(&self) -> bool {
                self.is_empty()
            }

            #[inline]
            fn is_full(&self) -> bool {
                self.is_full()
            }
        }

        impl<T: ::core::fmt::Debug, $($gen)*> ::core::fmt::Debug for $name<T, $($args)*> {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_list().entries(self.iter()).finish()
            }
        }

        impl<T: PartialEq, $($gen)*> PartialEq for $name<T, $($args)*> {
            fn eq(&self, other: &Self) -> bool {
                self.len() == other.len() && self.iter().eq(other.iter())
            }
        }

        impl<T: Eq, $($gen)*> Eq for $name<T, $($args)*> {}

        impl<T, U, $($gen)*> PartialEq<[U]> for $name<T, $($args)*>
        where
            T: PartialEq<U>,
        {
            fn eq(&self, other: &[U]) -> bool {
                if self.len() != other.len() {
                    return false;
                }
                let (self_a, self_b) = self.as_slices();
                let (other_a, other_b) = other.split_at(self_a.len());
                self_a == other_a && self_b == other_b
            }
        }

        impl<T, U, $($gen)*> PartialEq<&[U]> for $name<T, $($args)*>
        where
            T: PartialEq<U>,
        {
            #[inline]
            fn eq(&self, other: &&[U]) -> bool {
                PartialEq::eq(self, *other)
            }
        }

        impl<T, U, const M: usize, $($gen)*> PartialEq<[U; M]> for $name<T, $($args)*>
        where
            T: PartialEq<U>,
        {
            #[inline]
            fn eq(&self, other: &[U; M]) -> bool {
                PartialEq::eq(self, other.as_slice())
            }
        }

        impl<T: ::core::hash::Hash, $($gen)*> ::core::hash::Hash for $name<T, $($args)*> {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                state.write_usize(self.len());
                self.iter().for_each(|x| x.hash(state));
            }
        }

        impl<T, $($gen)*> ::core::ops::Index<usize> for $name<T, $($args)*> {
            type Output = T;

            #[inline]
            fn index(&self, index: usize) -> &Self::Output {
                self.get(index).expect("Out of bounds access")
            }
        }

        impl<T, $($gen)*> ::core::ops::IndexMut<usize> for $name<T, $($args)*> {
            #[inline]
            fn index_mut(&mut self, index: usize) -> &mut Self::Output {
                self.get_mut(index).expect("Out of bounds access")
            }
        }

        impl<T, $($gen)*> IntoIterator for $name<T, $($args)*> {
            type Item = T;
            type IntoIter = $crate::collections::IntoIter<T, Self>;

            #[inline]
            fn into_iter(self) -> Self::IntoIter {
                $crate::collections::IntoIter::new(self)
            }
        }

        impl<'a, T, $($gen)*> IntoIterator for &'a $name<T, $($args)*> {
            type Item = &'a T;
            type IntoIter = $crate::collections::ring::Iter<'a, T>;

            #[inline]
            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<'a, T, $($gen)*> IntoIterator for &'a mut $name<T, $($args)*> {
            type Item = &'a mut T;
            type IntoIter = $crate::collections::ring::IterMut<'a, T>;

            #[inline]
            fn into_iter(self) -> Self::IntoIter {
                self.iter_mut()
            }
        }
    };
}

pub(crate) use ring_backed_deque;
