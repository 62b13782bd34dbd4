//! Build-time back-end selection.
//!
//! The `backend_*` cargo features pick the type behind [`Deque`]. When more
//! than one is enabled the first of `backend_fixed`, `backend_inplace`,
//! `backend_growable`, `backend_chunked` wins; with none enabled the chunked
//! list is used.

use crate::collections;

/// Capacity of the fixed and inline back-ends.
pub const CAPACITY: usize = 16;

/// Slots per chunk of the chunked back-end.
pub const CHUNK_CAPACITY: usize = 16;

/// Slots added per growth of the growable back-end.
pub const GROWTH_INCREMENT: usize = 16;

#[cfg(feature = "backend_fixed")]
pub type Deque<T> = collections::FixedDeque<T>;

#[cfg(all(feature = "backend_inplace", not(feature = "backend_fixed")))]
pub type Deque<T> = collections::InplaceDeque<T, CAPACITY>;

#[cfg(all(
    feature = "backend_growable",
    not(any(feature = "backend_fixed", feature = "backend_inplace"))
))]
pub type Deque<T> = collections::GrowableDeque<T, GROWTH_INCREMENT>;

#[cfg(not(any(
    feature = "backend_fixed",
    feature = "backend_inplace",
    feature = "backend_growable"
)))]
pub type Deque<T> = collections::ChunkedDeque<T, CHUNK_CAPACITY>;

/// Name of the back-end [`Deque`] resolves to.
pub const BACKEND: &str = if cfg!(feature = "backend_fixed") {
    "fixed"
} else if cfg!(feature = "backend_inplace") {
    "inplace"
} else if cfg!(feature = "backend_growable") {
    "growable"
} else {
    "chunked"
};

/// An empty [`Deque`], sized by [`CAPACITY`] where the back-end is bounded.
#[inline]
pub fn new_deque<T>() -> Deque<T> {
    #[cfg(feature = "backend_fixed")]
    {
        Deque::with_capacity(CAPACITY)
    }
    #[cfg(not(feature = "backend_fixed"))]
    {
        Deque::new()
    }
}
