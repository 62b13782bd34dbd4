pub mod container_common;
pub mod deque_like;

pub use container_common::ContainerCommon;
pub use deque_like::DequeLike;
