//! Comparator-driven sort routines.
//!
//! Every routine has the shape `fn(&mut [T], &mut F)` with
//! `F: FnMut(&T, &T) -> Ordering`, so any of them can be passed straight to
//! [`DequeLike::sort_with`](crate::DequeLike::sort_with):
//!
//! ```
//! use deque_kit::{GrowableDeque, sort};
//!
//! let mut q: GrowableDeque<i32> = [3, 1, 2].into();
//! q.sort_with(sort::heap_sort, |a: &i32, b: &i32| b.cmp(a));
//! assert_eq!(q, [3, 2, 1]);
//! ```

use core::cmp::Ordering;

/// Below this length [`quick_sort`] hands the range to [`insertion_sort`].
const QUICK_SORT_CUTOFF: usize = 12;

/// Stable, `O(n^2)` worst case, allocation free.
pub fn insertion_sort<T, F>(v: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && compare(&v[j], &v[j - 1]) == Ordering::Less {
            v.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Unstable, `O(n log n)`, in place.
pub fn heap_sort<T, F>(v: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = v.len();
    for pos in (0..len / 2).rev() {
        sift_down(v, pos, len, compare);
    }
    for end in (1..len).rev() {
        v.swap(0, end);
        sift_down(v, 0, end, compare);
    }
}

/// Moves `v[pos]` down the max-heap `v[..end]` while a child is greater.
fn sift_down<T, F>(v: &mut [T], mut pos: usize, end: usize, compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    loop {
        let mut child = 2 * pos + 1;
        if child >= end {
            return;
        }
        // pick the greater of the two children
        if child + 1 < end && compare(&v[child], &v[child + 1]) == Ordering::Less {
            child += 1;
        }
        if compare(&v[pos], &v[child]) != Ordering::Less {
            return;
        }
        v.swap(pos, child);
        pos = child;
    }
}

/// Unstable, in place, `O(n log n)` expected.
///
/// Median-of-three pivot with a three-way split, so runs of equal keys are
/// settled in one pass. Recursion always descends into the shorter side,
/// so stack depth stays logarithmic.
pub fn quick_sort<T, F>(mut v: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    while v.len() > QUICK_SORT_CUTOFF {
        let (lt, gt) = partition(v, compare);
        let (left, rest) = core::mem::take(&mut v).split_at_mut(lt);
        let right = &mut rest[gt - lt..];
        if left.len() < right.len() {
            quick_sort(left, compare);
            v = right;
        } else {
            quick_sort(right, compare);
            v = left;
        }
    }
    insertion_sort(v, compare);
}

/// Splits `v` around a median-of-three pivot into `[..lt]` less than it,
/// `[lt..gt]` equal to it and `[gt..]` greater, returning `(lt, gt)`.
fn partition<T, F>(v: &mut [T], compare: &mut F) -> (usize, usize)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let last = v.len() - 1;
    let mid = last / 2;
    if compare(&v[mid], &v[0]) == Ordering::Less {
        v.swap(mid, 0);
    }
    if compare(&v[last], &v[0]) == Ordering::Less {
        v.swap(last, 0);
    }
    if compare(&v[mid], &v[last]) == Ordering::Less {
        v.swap(mid, last);
    }
    // v[last] now holds the median of the three samples.
    v.swap(0, last);

    // v[lt] is always a copy of the pivot.
    let (mut lt, mut i, mut gt) = (0, 1, v.len());
    while i < gt {
        match compare(&v[i], &v[lt]) {
            Ordering::Less => {
                v.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                v.swap(i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }
    (lt, gt)
}

/// Stable; the standard library's merge sort.
#[inline]
pub fn merge_sort<T, F>(v: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    v.sort_by(|a, b| compare(a, b));
}

/// Unstable; the standard library's pattern-defeating quicksort.
#[inline]
pub fn unstable_sort<T, F>(v: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    v.sort_unstable_by(|a, b| compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;

    type Routine = fn(&mut [i64], &mut fn(&i64, &i64) -> Ordering);

    const ROUTINES: [(&str, Routine); 5] = [
        ("insertion", insertion_sort),
        ("heap", heap_sort),
        ("quick", quick_sort),
        ("merge", merge_sort),
        ("unstable", unstable_sort),
    ];

    fn pseudo_random(len: usize, seed: u64) -> Vec<i64> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (state >> 33) as i64 % 50
            })
            .collect()
    }

    #[test]
    fn t_routines_sort_ascending_and_descending() {
        for (name, sort) in ROUTINES {
            for len in [0, 1, 2, 3, 11, 12, 13, 40, 257] {
                let input = pseudo_random(len, len as u64 + 7);
                let mut expected = input.clone();
                expected.sort();

                let mut v = input.clone();
                let mut asc: fn(&i64, &i64) -> Ordering = |a, b| a.cmp(b);
                sort(&mut v, &mut asc);
                assert_eq!(v, expected, "{name} ascending, len {len}");

                let mut desc: fn(&i64, &i64) -> Ordering = |a, b| b.cmp(a);
                sort(&mut v, &mut desc);
                expected.reverse();
                assert_eq!(v, expected, "{name} descending, len {len}");
            }
        }
    }

    #[test]
    fn t_sorted_and_reversed_inputs() {
        for (name, sort) in ROUTINES {
            let mut v: Vec<i64> = (0..100).collect();
            let mut asc: fn(&i64, &i64) -> Ordering = |a, b| a.cmp(b);
            sort(&mut v, &mut asc);
            assert!(v.is_sorted(), "{name} sorted input");
            v.reverse();
            sort(&mut v, &mut asc);
            assert!(v.is_sorted(), "{name} reversed input");
        }
    }

    #[test]
    fn t_stable_routines_keep_equal_order() {
        let input: Vec<(u8, usize)> = pseudo_random(64, 3)
            .into_iter()
            .enumerate()
            .map(|(i, k)| ((k % 4) as u8, i))
            .collect();
        let by_key = |a: &(u8, usize), b: &(u8, usize)| a.0.cmp(&b.0);

        let mut v = input.clone();
        insertion_sort(&mut v, &mut { by_key });
        assert!(v.windows(2).all(|w| w[0].0 < w[1].0 || (w[0].0 == w[1].0 && w[0].1 < w[1].1)));

        let mut v = input;
        merge_sort(&mut v, &mut { by_key });
        assert!(v.windows(2).all(|w| w[0].0 < w[1].0 || (w[0].0 == w[1].0 && w[0].1 < w[1].1)));
    }

    #[test]
    fn t_comparator_state_is_shared() {
        let mut calls = 0;
        let mut v = vec![3, 1, 2];
        quick_sort(&mut v, &mut |a: &i32, b: &i32| {
            calls += 1;
            a.cmp(b)
        });
        assert_eq!(v, [1, 2, 3]);
        assert!(calls > 0);
    }

    #[test]
    fn t_quick_sort_many_duplicates() {
        const N: usize = 40_000;
        let mut all_equal = vec![7u32; N];
        let mut few_keys: Vec<u32> = (0..N as u32)
            .map(|i| i.wrapping_mul(2_654_435_761) % 4)
            .collect();
        for v in [&mut all_equal, &mut few_keys] {
            let mut calls = 0usize;
            quick_sort(&mut v[..], &mut |a: &u32, b: &u32| {
                calls += 1;
                a.cmp(b)
            });
            assert!(v.is_sorted());
            assert!(calls < 10 * N, "{calls} comparisons for {N} elements");
        }
        assert_eq!(few_keys.iter().filter(|&&k| k == 0).count(), N / 4);
    }
}
