use core::{
    fmt,
    iter::{Flatten, FusedIterator},
    marker::PhantomData,
    ptr::NonNull,
    slice,
};

use super::{Chunk, ChunkedDeque};

/// Borrowing iterator over a [`ChunkedDeque`], front to back.
///
/// Each end walks its own chunk; `remaining` keeps the two ends from
/// crossing once they meet inside the same chunk.
pub struct Iter<'a, T, const CHUNK: usize> {
    deque: &'a ChunkedDeque<T, CHUNK>,
    front: slice::Iter<'a, T>,
    next_chunk: Option<usize>,
    back: slice::Iter<'a, T>,
    prev_chunk: Option<usize>,
    remaining: usize,
}

impl<'a, T, const CHUNK: usize> Iter<'a, T, CHUNK> {
    pub(super) fn new(deque: &'a ChunkedDeque<T, CHUNK>) -> Self {
        let (front, next_chunk) = match deque.first {
            Some(i) => {
                let chunk = deque.chunk(i);
                (chunk.as_slice().iter(), chunk.next)
            }
            None => ([].iter(), None),
        };
        let (back, prev_chunk) = match deque.last {
            Some(i) => {
                let chunk = deque.chunk(i);
                (chunk.as_slice().iter(), chunk.prev)
            }
            None => ([].iter(), None),
        };
        Self {
            deque,
            front,
            next_chunk,
            back,
            prev_chunk,
            remaining: deque.len,
        }
    }
}

impl<T, const CHUNK: usize> Clone for Iter<'_, T, CHUNK> {
    fn clone(&self) -> Self {
        Self {
            deque: self.deque,
            front: self.front.clone(),
            next_chunk: self.next_chunk,
            back: self.back.clone(),
            prev_chunk: self.prev_chunk,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug, const CHUNK: usize> fmt::Debug for Iter<'_, T, CHUNK> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T, const CHUNK: usize> Iterator for Iter<'a, T, CHUNK> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            if let Some(x) = self.front.next() {
                self.remaining -= 1;
                return Some(x);
            }
            let chunk = self.deque.chunk(self.next_chunk?);
            self.front = chunk.as_slice().iter();
            self.next_chunk = chunk.next;
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    #[inline]
    fn count(self) -> usize {
        self.remaining
    }

    #[inline]
    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T, const CHUNK: usize> DoubleEndedIterator for Iter<'a, T, CHUNK> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            if let Some(x) = self.back.next_back() {
                self.remaining -= 1;
                return Some(x);
            }
            let chunk = self.deque.chunk(self.prev_chunk?);
            self.back = chunk.as_slice().iter();
            self.prev_chunk = chunk.prev;
        }
    }
}

impl<T, const CHUNK: usize> ExactSizeIterator for Iter<'_, T, CHUNK> {
    #[inline]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, const CHUNK: usize> FusedIterator for Iter<'_, T, CHUNK> {}

/// Yields each linked chunk's live elements as one `&mut [T]`, in link
/// order from the front and in reverse from the back.
///
/// Every chunk is handed out at most once, so the slices never alias.
struct ChunkSlices<'a, T> {
    chunks: NonNull<Option<Chunk<T>>>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
    _marker: PhantomData<&'a mut Chunk<T>>,
}

impl<'a, T> ChunkSlices<'a, T> {
    /// # Safety
    ///
    /// `index` must be a linked chunk not yet handed out by this walker.
    unsafe fn take(&mut self, index: usize) -> &'a mut Chunk<T> {
        match unsafe { &mut *self.chunks.as_ptr().add(index) } {
            Some(chunk) => chunk,
            None => unreachable!("chunk {index} is linked but free"),
        }
    }
}

impl<'a, T> Iterator for ChunkSlices<'a, T> {
    type Item = &'a mut [T];

    fn next(&mut self) -> Option<&'a mut [T]> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.front?;
        self.remaining -= 1;
        // SAFETY: `remaining` stops the two cursors before they cross.
        let chunk = unsafe { self.take(index) };
        self.front = chunk.next;
        Some(chunk.as_mut_slice())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for ChunkSlices<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut [T]> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.back?;
        self.remaining -= 1;
        // SAFETY: as in `next`.
        let chunk = unsafe { self.take(index) };
        self.back = chunk.prev;
        Some(chunk.as_mut_slice())
    }
}

/// Mutable iterator over a [`ChunkedDeque`], front to back.
pub struct IterMut<'a, T> {
    inner: Flatten<ChunkSlices<'a, T>>,
    remaining: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(super) fn new<const CHUNK: usize>(deque: &'a mut ChunkedDeque<T, CHUNK>) -> Self {
        let slices = ChunkSlices {
            front: deque.first,
            back: deque.last,
            remaining: deque.chunk_count(),
            chunks: NonNull::from(deque.chunks.as_mut_slice()).cast(),
            _marker: PhantomData,
        };
        Self {
            inner: slices.flatten(),
            remaining: deque.len,
        }
    }
}

unsafe impl<T: Send> Send for IterMut<'_, T> {}

unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        let x = self.inner.next()?;
        self.remaining -= 1;
        Some(x)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        let x = self.inner.next_back()?;
        self.remaining -= 1;
        Some(x)
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::collections::ChunkedDeque;

    fn mixed() -> ChunkedDeque<i32, 3> {
        let mut q = ChunkedDeque::new();
        for i in 0..5 {
            q.push_back(i).unwrap();
        }
        for i in 1..5 {
            q.push_front(-i).unwrap();
        }
        q
    }

    #[test]
    fn t_iter_both_ends_meet() {
        let q = mixed();
        let mut it = q.iter();
        assert_eq!(it.len(), 9);
        assert_eq!(it.next(), Some(&-4));
        assert_eq!(it.next_back(), Some(&4));
        let middle: Vec<i32> = it.by_ref().copied().collect();
        assert_eq!(middle, [-3, -2, -1, 0, 1, 2, 3]);
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn t_iter_rev_single_chunk() {
        let q: ChunkedDeque<i32, 8> = (0..5).collect();
        let mut it = q.iter();
        assert_eq!(it.next_back(), Some(&4));
        assert_eq!(it.next(), Some(&0));
        assert_eq!(it.rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
    }

    #[test]
    fn t_iter_mut_follows_links() {
        let mut q = mixed();
        for x in q.iter_mut() {
            *x *= 10;
        }
        let expected: Vec<i32> = (-4..5).map(|x| x * 10).collect();
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), expected);
        let mut it = q.iter_mut();
        assert_eq!(it.next_back().map(|x| *x), Some(40));
        assert_eq!(it.len(), 8);
    }

    #[test]
    fn t_iter_mut_ends_meet_without_overlap() {
        let mut q = mixed();
        let mut it = q.iter_mut();
        let mut taken = Vec::new();
        for step in 0.. {
            let x = if step % 3 == 0 { it.next_back() } else { it.next() };
            let Some(x) = x else { break };
            *x += 100;
            taken.push(*x);
            assert_eq!(it.len(), 9 - taken.len());
        }
        assert_eq!(taken.len(), 9);
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
        let expected: Vec<i32> = (-4..5).map(|x| x + 100).collect();
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), expected);

        let mut q: ChunkedDeque<i32, 2> = ChunkedDeque::new();
        q.push_back(1).unwrap();
        q.push_front(0).unwrap();
        q.pop_back();
        assert_eq!(q.chunk_count(), 1);
        assert_eq!(q.iter_mut().rev().map(|x| *x).collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn t_empty() {
        let mut q = ChunkedDeque::<i32, 4>::new();
        assert_eq!(q.iter().next(), None);
        assert_eq!(q.iter_mut().next_back(), None);
        q.push_back(1).unwrap();
        q.pop_back();
        assert_eq!(q.iter().next_back(), None);
    }
}
