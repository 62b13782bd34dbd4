//! Double-ended queues over four interchangeable storage strategies.
//!
//! | type | storage | capacity |
//! |---|---|---|
//! | [`FixedDeque`] | one heap ring buffer | chosen once at runtime |
//! | [`InplaceDeque`] | one inline ring buffer | const generic |
//! | [`GrowableDeque`] | one heap ring buffer | grows by a fixed increment |
//! | [`ChunkedDeque`] | linked fixed-size chunks | grows and shrinks by chunks |
//!
//! All of them implement [`DequeLike`], so code written against the trait
//! behaves the same whichever back-end [`config::Deque`] resolves to.

/// Emits a `tracing` event at trace level when the `tracing` feature is on.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
    };
}

pub mod assert;
pub mod collections;
pub mod config;
pub mod error;
pub mod sort;

pub use collections::{
    ChunkedDeque, ContainerCommon, DequeLike, FixedDeque, GrowableDeque, InplaceDeque,
};
pub use config::Deque;
pub use error::PushError;
