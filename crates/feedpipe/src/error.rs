//! Typed error taxonomy for the feed protocol.
//!
//! End-of-sequence is intentionally absent: bounded sources and queues report
//! exhaustion as `Ok(None)`, keeping normal termination type-distinct from
//! every fatal case below. None of these variants is retryable.

use crate::pipeline::BindingState;
use crate::placement::Device;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// A source produced a sample outside its declared envelope, or with an
    /// element type that differs from its descriptor.
    #[error("input '{input}' violated its declared sample contract: {reason}")]
    ShapeContract { input: String, reason: String },

    /// No-copy was requested for an input whose queue lives on a different
    /// device than the pipeline reads from. Surfaced at bind time.
    #[error(
        "input '{input}' requested no-copy but its queue is on {queue} \
         while the pipeline reads on {pipeline}"
    )]
    PlacementConfig {
        input: String,
        queue: Device,
        pipeline: Device,
    },

    /// An operation was attempted while the binding was in the wrong state.
    #[error("cannot {op} while the binding is {state}")]
    BindingState {
        op: &'static str,
        state: BindingState,
    },

    /// Bind-time validation failure: duplicate names, zero batch size,
    /// shard id out of range, and similar static misconfiguration.
    #[error("invalid feed configuration: {0}")]
    Config(String),
}
