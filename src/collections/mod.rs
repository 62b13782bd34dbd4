pub mod chunked;
pub mod fixed;
pub mod growable;
pub mod inplace;
pub mod into_iter;
pub mod ring;
pub mod traits;

pub use chunked::ChunkedDeque;
pub use fixed::FixedDeque;
pub use growable::GrowableDeque;
pub use inplace::InplaceDeque;
pub use into_iter::IntoIter;
pub use traits::{ContainerCommon, DequeLike};
