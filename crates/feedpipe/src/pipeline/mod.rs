//! Pipeline binding: named feeds assembled into a runnable batch pipeline.

pub mod batch;
pub mod binding;
pub mod transform;

pub use batch::Batch;
pub use binding::{build_feed, BindingState, PipelineBinding, PipelineOptions};
pub use transform::{derive, DERIVE_OFFSET};
