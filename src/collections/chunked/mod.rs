//! Unrolled linked list deque.
//!
//! Elements live in fixed-size chunks. Each chunk keeps its elements in one
//! contiguous run `head..head + len` and links to its neighbours by arena
//! index. Only the first chunk can have room at its front and only the last
//! one room at its back, so pushes touch at most one new chunk and pops free
//! a chunk the moment it runs empty, unless it is the only one left.

pub mod iter;

use core::{cmp::Ordering, fmt, hash, iter::successors, mem, ops, ptr};
use std::collections::TryReserveError;

pub use iter::{Iter, IterMut};

use crate::{
    collections::{
        ContainerCommon, DequeLike, IntoIter,
        ring::{HeapSlots, assume_init_slice, assume_init_slice_mut, try_alloc_slots},
    },
    error::PushError,
};

struct Chunk<T> {
    slots: HeapSlots<T>,
    head: usize,
    len: usize,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<T> Chunk<T> {
    #[inline]
    fn as_slice(&self) -> &[T] {
        let live = self.head..self.head + self.len;
        unsafe { assume_init_slice(&self.slots[live]) }
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        let live = self.head..self.head + self.len;
        unsafe { assume_init_slice_mut(&mut self.slots[live]) }
    }

    #[inline]
    fn has_front_room(&self) -> bool {
        self.head > 0
    }

    #[inline]
    fn has_back_room(&self) -> bool {
        self.head + self.len < self.slots.len()
    }

    #[inline]
    fn push_front(&mut self, value: T) {
        debug_assert!(self.has_front_room());
        self.head -= 1;
        self.slots[self.head].write(value);
        self.len += 1;
    }

    #[inline]
    fn push_back(&mut self, value: T) {
        debug_assert!(self.has_back_room());
        self.slots[self.head + self.len].write(value);
        self.len += 1;
    }

    fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = unsafe { self.slots[self.head].assume_init_read() };
        self.head += 1;
        self.len -= 1;
        Some(value)
    }

    fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(unsafe { self.slots[self.head + self.len].assume_init_read() })
    }

    fn clear(&mut self) {
        let live = self.as_mut_slice() as *mut [T];
        self.head = 0;
        self.len = 0;
        unsafe { ptr::drop_in_place(live) };
    }
}

impl<T> Drop for Chunk<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Unbounded deque built from linked chunks of `CHUNK` slots each.
pub struct ChunkedDeque<T, const CHUNK: usize = 16> {
    chunks: Vec<Option<Chunk<T>>>,
    free: Vec<usize>,
    first: Option<usize>,
    last: Option<usize>,
    len: usize,
}

impl<T, const CHUNK: usize> ChunkedDeque<T, CHUNK> {
    #[inline]
    pub const fn new() -> Self {
        const { assert!(CHUNK != 0, "ChunkedDeque CHUNK must be > 0") };
        Self {
            chunks: Vec::new(),
            free: Vec::new(),
            first: None,
            last: None,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Never true: a push into a full boundary chunk links a new one.
    #[inline]
    pub fn is_full(&self) -> bool {
        false
    }

    /// Slots per chunk.
    #[inline]
    pub const fn chunk_capacity(&self) -> usize {
        CHUNK
    }

    /// Number of chunks currently linked.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len() - self.free.len()
    }

    /// Total slots held across all chunks.
    #[inline]
    pub fn allocated_capacity(&self) -> usize {
        self.chunk_count() * CHUNK
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.chunk_count() != 0
    }

    pub fn push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        if let Some(first) = self.first {
            let chunk = self.chunk_mut(first);
            if chunk.len == 0 {
                chunk.head = CHUNK;
            }
            if chunk.has_front_room() {
                chunk.push_front(value);
                self.len += 1;
                return Ok(());
            }
        }

        let index = match self.alloc_chunk(CHUNK) {
            Ok(index) => index,
            Err(err) => return Err(PushError::AllocFailed(value, err)),
        };
        let old_first = self.first.replace(index);
        let chunk = self.chunk_mut(index);
        chunk.next = old_first;
        chunk.push_front(value);
        match old_first {
            Some(old_first) => self.chunk_mut(old_first).prev = Some(index),
            None => self.last = Some(index),
        }
        self.len += 1;
        Ok(())
    }

    pub fn push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        if let Some(last) = self.last {
            let chunk = self.chunk_mut(last);
            if chunk.len == 0 {
                chunk.head = 0;
            }
            if chunk.has_back_room() {
                chunk.push_back(value);
                self.len += 1;
                return Ok(());
            }
        }

        let index = match self.alloc_chunk(0) {
            Ok(index) => index,
            Err(err) => return Err(PushError::AllocFailed(value, err)),
        };
        let old_last = self.last.replace(index);
        let chunk = self.chunk_mut(index);
        chunk.prev = old_last;
        chunk.push_back(value);
        match old_last {
            Some(old_last) => self.chunk_mut(old_last).next = Some(index),
            None => self.first = Some(index),
        }
        self.len += 1;
        Ok(())
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let first = self.first?;
        let chunk = self.chunk_mut(first);
        let value = chunk.pop_front()?;
        let (emptied, next) = (chunk.len == 0, chunk.next);
        self.len -= 1;
        if let (true, Some(next)) = (emptied, next) {
            self.chunk_mut(next).prev = None;
            self.first = Some(next);
            self.free_chunk(first);
        }
        Some(value)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let last = self.last?;
        let chunk = self.chunk_mut(last);
        let value = chunk.pop_back()?;
        let (emptied, prev) = (chunk.len == 0, chunk.prev);
        self.len -= 1;
        if let (true, Some(prev)) = (emptied, prev) {
            self.chunk_mut(prev).next = None;
            self.last = Some(prev);
            self.free_chunk(last);
        }
        Some(value)
    }

    pub fn front(&self) -> Option<&T> {
        self.first.and_then(|i| self.chunk(i).as_slice().first())
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        let first = self.first?;
        self.chunk_mut(first).as_mut_slice().first_mut()
    }

    pub fn back(&self) -> Option<&T> {
        self.last.and_then(|i| self.chunk(i).as_slice().last())
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        let last = self.last?;
        self.chunk_mut(last).as_mut_slice().last_mut()
    }

    /// Walks the chunks from whichever end is closer to `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        let (chunk, offset) = self.locate(index)?;
        self.chunk(chunk).as_slice().get(offset)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let (chunk, offset) = self.locate(index)?;
        self.chunk_mut(chunk).as_mut_slice().get_mut(offset)
    }

    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.chunk_indices()
            .any(|i| self.chunk(i).as_slice().contains(x))
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, T, CHUNK> {
        Iter::new(self)
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// Visits every element front to back.
    pub fn for_each_mut<F: FnMut(&mut T)>(&mut self, mut f: F) {
        let mut cursor = self.first;
        while let Some(index) = cursor {
            let chunk = self.chunk_mut(index);
            chunk.as_mut_slice().iter_mut().for_each(&mut f);
            cursor = chunk.next;
        }
    }

    /// Visits every element back to front.
    pub fn rev_for_each_mut<F: FnMut(&mut T)>(&mut self, mut f: F) {
        let mut cursor = self.last;
        while let Some(index) = cursor {
            let chunk = self.chunk_mut(index);
            chunk.as_mut_slice().iter_mut().rev().for_each(&mut f);
            cursor = chunk.prev;
        }
    }

    /// Moves the elements into one contiguous buffer, hands it to `sort`
    /// together with `compare`, then writes the result back through the
    /// chunks without changing their layout.
    pub fn sort_with<S, C>(&mut self, sort: S, mut compare: C)
    where
        S: FnOnce(&mut [T], &mut C),
        C: FnMut(&T, &T) -> Ordering,
    {
        let mut values = Vec::with_capacity(self.len);
        let mut layout = Vec::with_capacity(self.chunk_count());
        let mut cursor = self.first;
        while let Some(index) = cursor {
            let chunk = self.chunk_mut(index);
            let live = chunk.head..chunk.head + chunk.len;
            layout.push((index, chunk.len));
            // the chunk forgets its elements before they move; `values` owns them now.
            chunk.len = 0;
            values.extend(
                chunk.slots[live]
                    .iter()
                    .map(|slot| unsafe { slot.assume_init_read() }),
            );
            cursor = chunk.next;
        }
        self.len = 0;

        // every chunk is empty but still linked; a panicking `sort` must not
        // leave them behind.
        let guard = ClearOnUnwind(&mut *self);
        sort(&mut values, &mut compare);
        mem::forget(guard);

        let mut values = values.into_iter();
        for (index, len) in layout {
            let chunk = self.chunk_mut(index);
            let head = chunk.head;
            for (slot, value) in chunk.slots[head..head + len].iter_mut().zip(&mut values) {
                slot.write(value);
            }
            chunk.len = len;
            self.len += len;
        }
    }

    /// Drops every element, keeping a single empty chunk if any was allocated.
    pub fn clear(&mut self) {
        let Some(first) = self.first else {
            return;
        };
        let mut chunks = mem::take(&mut self.chunks);
        let kept = chunks.get_mut(first).and_then(Option::take);
        self.free.clear();
        self.first = None;
        self.last = None;
        self.len = 0;
        drop(chunks);

        if let Some(mut chunk) = kept {
            chunk.clear();
            chunk.prev = None;
            chunk.next = None;
            self.chunks.push(Some(chunk));
            self.first = Some(0);
            self.last = Some(0);
        }
    }

    /// Drops every element and frees every chunk, leaving the deque as `new()` made it.
    pub fn destroy(&mut self) {
        let chunks = mem::take(&mut self.chunks);
        trace_event!(chunks = chunks.len() - self.free.len(), "releasing deque chunks");
        self.free = Vec::new();
        self.first = None;
        self.last = None;
        self.len = 0;
        drop(chunks);
    }
}

impl<T, const CHUNK: usize> ChunkedDeque<T, CHUNK> {
    #[inline]
    fn chunk(&self, index: usize) -> &Chunk<T> {
        match &self.chunks[index] {
            Some(chunk) => chunk,
            None => unreachable!("chunk {index} is linked but free"),
        }
    }

    #[inline]
    fn chunk_mut(&mut self, index: usize) -> &mut Chunk<T> {
        match &mut self.chunks[index] {
            Some(chunk) => chunk,
            None => unreachable!("chunk {index} is linked but free"),
        }
    }

    /// Chunk indices in link order, first to last.
    fn chunk_indices(&self) -> impl Iterator<Item = usize> + '_ {
        successors(self.first, move |&i| self.chunk(i).next)
    }

    /// Chunk index and offset inside it of the element at `index`.
    fn locate(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.len {
            return None;
        }
        if index < self.len / 2 {
            let mut offset = index;
            let mut cursor = self.first;
            while let Some(i) = cursor {
                let chunk = self.chunk(i);
                if offset < chunk.len {
                    return Some((i, offset));
                }
                offset -= chunk.len;
                cursor = chunk.next;
            }
        } else {
            let mut from_back = self.len - 1 - index;
            let mut cursor = self.last;
            while let Some(i) = cursor {
                let chunk = self.chunk(i);
                if from_back < chunk.len {
                    return Some((i, chunk.len - 1 - from_back));
                }
                from_back -= chunk.len;
                cursor = chunk.prev;
            }
        }
        None
    }

    /// Allocates an unlinked, empty chunk whose run starts at `head`.
    fn alloc_chunk(&mut self, head: usize) -> Result<usize, TryReserveError> {
        let slots = match try_alloc_slots(CHUNK) {
            Ok(slots) => slots,
            Err(err) => {
                trace_event!(chunk_capacity = CHUNK, error = %err, "deque chunk allocation failed");
                return Err(err);
            }
        };
        let chunk = Chunk {
            slots,
            head,
            len: 0,
            prev: None,
            next: None,
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.chunks[index] = Some(chunk);
                index
            }
            None => {
                self.chunks.try_reserve(1)?;
                self.chunks.push(Some(chunk));
                self.chunks.len() - 1
            }
        };
        trace_event!(index, chunks = self.chunk_count(), "allocated deque chunk");
        Ok(index)
    }

    /// Frees an already unlinked chunk and recycles its arena slot.
    fn free_chunk(&mut self, index: usize) {
        debug_assert!(self.chunk(index).len == 0);
        self.chunks[index] = None;
        self.free.push(index);
        trace_event!(index, chunks = self.chunk_count(), "freed deque chunk");
    }
}

/// Clears the deque it borrows when dropped during an unwind.
struct ClearOnUnwind<'a, T, const CHUNK: usize>(&'a mut ChunkedDeque<T, CHUNK>);

impl<T, const CHUNK: usize> Drop for ClearOnUnwind<'_, T, CHUNK> {
    fn drop(&mut self) {
        self.0.clear();
    }
}

impl<T, const CHUNK: usize> Default for ChunkedDeque<T, CHUNK> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const CHUNK: usize> Clone for ChunkedDeque<T, CHUNK> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T, const CHUNK: usize> Extend<T> for ChunkedDeque<T, CHUNK> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if let Err(err) = self.push_back(value) {
                panic!("{err}");
            }
        }
    }
}

impl<T, const CHUNK: usize> FromIterator<T> for ChunkedDeque<T, CHUNK> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut q = Self::new();
        q.extend(iter);
        q
    }
}

impl<T, const N: usize, const CHUNK: usize> From<[T; N]> for ChunkedDeque<T, CHUNK> {
    fn from(value: [T; N]) -> Self {
        Self::from_iter(value)
    }
}

impl<T: fmt::Debug, const CHUNK: usize> fmt::Debug for ChunkedDeque<T, CHUNK> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, const CHUNK: usize> PartialEq for ChunkedDeque<T, CHUNK> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const CHUNK: usize> Eq for ChunkedDeque<T, CHUNK> {}

impl<T, U, const CHUNK: usize> PartialEq<[U]> for ChunkedDeque<T, CHUNK>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.len == other.len() && self.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<T, U, const CHUNK: usize> PartialEq<&[U]> for ChunkedDeque<T, CHUNK>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        PartialEq::eq(self, *other)
    }
}

impl<T, U, const CHUNK: usize, const M: usize> PartialEq<[U; M]> for ChunkedDeque<T, CHUNK>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U; M]) -> bool {
        PartialEq::eq(self, other.as_slice())
    }
}

impl<T: hash::Hash, const CHUNK: usize> hash::Hash for ChunkedDeque<T, CHUNK> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        self.iter().for_each(|x| x.hash(state));
    }
}

impl<T, const CHUNK: usize> ops::Index<usize> for ChunkedDeque<T, CHUNK> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("Out of bounds access")
    }
}

impl<T, const CHUNK: usize> ops::IndexMut<usize> for ChunkedDeque<T, CHUNK> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.get_mut(index).expect("Out of bounds access")
    }
}

impl<T, const CHUNK: usize> IntoIterator for ChunkedDeque<T, CHUNK> {
    type Item = T;
    type IntoIter = IntoIter<T, Self>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, const CHUNK: usize> IntoIterator for &'a ChunkedDeque<T, CHUNK> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, CHUNK>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const CHUNK: usize> IntoIterator for &'a mut ChunkedDeque<T, CHUNK> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, const CHUNK: usize> ContainerCommon for ChunkedDeque<T, CHUNK> {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn capacity(&self) -> usize {
        usize::MAX
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn is_full(&self) -> bool {
        false
    }
}

impl<T, const CHUNK: usize> DequeLike<T> for ChunkedDeque<T, CHUNK> {
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

    #[test]
    fn t_new_allocates_nothing() {
        let q = ChunkedDeque::<i32, 4>::new();
        assert!(q.is_empty());
        assert!(!q.is_allocated());
        assert_eq!(q.chunk_count(), 0);
        assert_eq!(q.front(), None);
        assert_eq!(q.get(0), None);
    }

    #[test]
    fn t_push_back_links_chunks() {
        let mut q = ChunkedDeque::<i32, 4>::new();
        for i in 0..9 {
            q.push_back(i).unwrap();
        }
        assert_eq!(q.chunk_count(), 3);
        assert_eq!(q.allocated_capacity(), 12);
        assert_eq!(q, [0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(q.front(), Some(&0));
        assert_eq!(q.back(), Some(&8));
    }

    #[test]
    fn t_push_front_fills_new_chunk_from_the_right() {
        let mut q = ChunkedDeque::<i32, 4>::new();
        q.push_front(3).unwrap();
        assert_eq!(q.chunk(q.first.unwrap()).head, 3);
        for i in (0..3).rev() {
            q.push_front(i).unwrap();
        }
        assert_eq!(q.chunk_count(), 1);
        q.push_front(-1).unwrap();
        assert_eq!(q.chunk_count(), 2);
        assert_eq!(q, [-1, 0, 1, 2, 3]);
    }

    #[test]
    fn t_pop_frees_emptied_chunks() {
        let mut q = ChunkedDeque::<i32, 2>::new();
        for i in 0..6 {
            q.push_back(i).unwrap();
        }
        assert_eq!(q.chunk_count(), 3);
        assert_eq!(q.pop_front(), Some(0));
        assert_eq!(q.chunk_count(), 3);
        assert_eq!(q.pop_front(), Some(1));
        assert_eq!(q.chunk_count(), 2);
        assert_eq!(q.pop_back(), Some(5));
        assert_eq!(q.pop_back(), Some(4));
        assert_eq!(q.chunk_count(), 1);
        assert_eq!(q.pop_back(), Some(3));
        assert_eq!(q.pop_back(), Some(2));
        // the sole chunk survives running empty.
        assert_eq!(q.chunk_count(), 1);
        assert_eq!(q.pop_back(), None);
        assert_eq!(q.pop_front(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn t_sole_empty_chunk_is_reused_from_both_ends() {
        let mut q = ChunkedDeque::<i32, 4>::new();
        q.push_back(1).unwrap();
        q.pop_back();
        q.push_front(0).unwrap();
        q.push_back(1).unwrap();
        assert_eq!(q.chunk_count(), 2);
        assert_eq!(q, [0, 1]);
        q.clear();
        q.push_back(2).unwrap();
        q.push_back(3).unwrap();
        assert_eq!(q.chunk_count(), 1);
        assert_eq!(q, [2, 3]);
    }

    #[test]
    fn t_freed_slots_are_recycled() {
        let mut q = ChunkedDeque::<i32, 2>::new();
        for i in 0..4 {
            q.push_back(i).unwrap();
        }
        q.pop_front();
        q.pop_front();
        assert_eq!(q.free, [0]);
        q.push_back(4).unwrap();
        q.push_back(5).unwrap();
        assert!(q.free.is_empty());
        assert_eq!(q.chunks.len(), 2);
        assert_eq!(q, [2, 3, 4, 5]);
    }

    #[test]
    fn t_get_from_both_ends() {
        let mut q = ChunkedDeque::<i32, 3>::new();
        for i in 0..5 {
            q.push_back(i).unwrap();
        }
        for i in 1..5 {
            q.push_front(-i).unwrap();
        }
        let expected: Vec<i32> = (-4..5).collect();
        for (i, x) in expected.iter().enumerate() {
            assert_eq!(q.get(i), Some(x));
        }
        assert_eq!(q.get(expected.len()), None);
        *q.get_mut(7).unwrap() = 70;
        assert_eq!(q[7], 70);
    }

    #[test]
    fn t_clear_keeps_one_chunk() {
        let mut q = ChunkedDeque::<String, 2>::new();
        for s in ["a", "b", "c", "d", "e"] {
            q.push_back(s.to_string()).unwrap();
        }
        assert_eq!(q.chunk_count(), 3);
        q.clear();
        assert!(q.is_empty());
        assert!(q.is_allocated());
        assert_eq!(q.chunk_count(), 1);
        q.destroy();
        assert!(!q.is_allocated());
        assert_eq!(q.chunk_count(), 0);
        q.clear();
        assert!(!q.is_allocated());
    }

    #[test]
    fn t_sort_keeps_layout() {
        let mut q = ChunkedDeque::<i32, 4>::new();
        for i in [5, 6, 7, 8, 9] {
            q.push_back(i).unwrap();
        }
        for i in [4, 3, 2, 1, 0] {
            q.push_front(9 - i).unwrap();
        }
        let chunks = q.chunk_count();
        q.sort_with(crate::sort::insertion_sort, |a, b| a.cmp(b));
        assert_eq!(q.chunk_count(), chunks);
        assert_eq!(q.len(), 10);
        assert_eq!(q, [5, 5, 6, 6, 7, 7, 8, 8, 9, 9]);
    }

    #[test]
    fn t_panicking_sort_leaves_usable_deque() {
        use std::{
            cell::Cell,
            panic::{AssertUnwindSafe, catch_unwind},
            rc::Rc,
        };

        #[derive(Debug)]
        struct Counted(i32, Rc<Cell<usize>>);

        impl Drop for Counted {
            fn drop(&mut self) {
                self.1.set(self.1.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));
        let mut q = ChunkedDeque::<Counted, 2>::new();
        for i in 0..6 {
            q.push_back(Counted(i, Rc::clone(&drops))).unwrap();
        }
        assert_eq!(q.chunk_count(), 3);

        let res = catch_unwind(AssertUnwindSafe(|| {
            q.sort_with(|_: &mut [Counted], _| panic!("comparator gave up"), |a, b| a.0.cmp(&b.0));
        }));
        assert!(res.is_err());
        assert_eq!(drops.get(), 6);
        assert!(q.is_empty());
        assert_eq!(q.chunk_count(), 1);

        q.push_back(Counted(42, Rc::clone(&drops))).unwrap();
        assert_eq!(q.front().map(|c| c.0), Some(42));
        assert_eq!(q.back().map(|c| c.0), Some(42));
        q.push_front(Counted(41, Rc::clone(&drops))).unwrap();
        assert_eq!(q.iter().map(|c| c.0).collect::<Vec<_>>(), [41, 42]);
        assert_eq!(q.pop_back().map(|c| c.0), Some(42));
        drop(q);
        assert_eq!(drops.get(), 8);
    }

    #[test]
    fn t_rev_for_each_mut_order() {
        let mut q: ChunkedDeque<i32, 2> = (0..5).collect();
        let mut seen = Vec::new();
        q.rev_for_each_mut(|x| seen.push(*x));
        assert_eq!(seen, [4, 3, 2, 1, 0]);
    }
}
