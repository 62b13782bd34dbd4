/// Marker implemented only by types that encode a satisfied compile time condition.
pub trait True {}
