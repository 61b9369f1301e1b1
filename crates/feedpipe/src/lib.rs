//! feedpipe bridges external, pull-based sample sources into fixed-size,
//! device-aware batches consumed by a pipeline with named, statically
//! declared inputs.
//!
//! The crate covers the feed protocol only: sample sources, source adapters,
//! placement resolution, and the pipeline binding state machine. Execution
//! engines plug in behind [`engine::FeedEngine`]; a reference host-threaded
//! engine lives in the `feedpipe-engine-host` crate.

pub mod engine;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod placement;
pub mod source;
pub mod tensor;

pub use engine::{FeedEngine, SampleQueue};
pub use error::FeedError;
pub use feed::{Dim, FeedSignature, InputSlot, SourceDescriptor, SourceKind};
pub use pipeline::{build_feed, Batch, BindingState, PipelineBinding, PipelineOptions};
pub use placement::{Device, Placement};
pub use source::{CounterSource, FixedSource, RandomSource, Source};
pub use tensor::{DType, Shape, Tensor};
