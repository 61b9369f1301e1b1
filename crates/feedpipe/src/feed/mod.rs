//! Source adapters: named, shape/type-declared feeds over sample sources.

pub mod adapter;
pub mod descriptor;

pub use adapter::{InputData, InputSlot};
pub use descriptor::{Dim, FeedSignature, SourceDescriptor, SourceKind};
