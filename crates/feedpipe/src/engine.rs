//! Trait seam between the feed core and an execution engine.
//!
//! The engine supplies three primitives the core never reimplements: a
//! generator-to-queue adapter over a sample source, a repeating
//! constant-value queue, and a device-transfer step for one batch worth of
//! samples. A binding is generic over the engine the way compute code is
//! generic over a backend.

use crate::error::FeedError;
use crate::placement::Device;
use crate::source::Source;
use crate::tensor::Tensor;

/// Pull-based queue of single samples living on one declared device.
///
/// A queue delivers samples in exactly the order its source produced them
/// and reports exhaustion as `Ok(None)`.
pub trait SampleQueue: Send {
    /// Device the queue's output memory is placed on.
    fn device(&self) -> Device;

    /// Pulls the next sample, or `Ok(None)` once the feeding source ends.
    fn pull(&mut self) -> Result<Option<Tensor>, FeedError>;
}

/// Execution-engine contract consumed by pipeline bindings.
pub trait FeedEngine: Send + Sync {
    type Queue: SampleQueue;

    fn engine_name(&self) -> &str;

    /// Adapts a sample source into a pull-based queue on `device`.
    ///
    /// `capacity` bounds how far the queue may run ahead of its consumer;
    /// a full queue blocks the producer, an empty one blocks the consumer.
    fn source_queue(
        &self,
        source: Source,
        device: Device,
        capacity: usize,
    ) -> Result<Self::Queue, FeedError>;

    /// Builds a queue that yields `value` forever.
    fn value_queue(&self, value: Tensor, device: Device) -> Result<Self::Queue, FeedError>;

    /// Copies one batch worth of samples across a device boundary.
    fn transfer(
        &self,
        samples: Vec<Tensor>,
        from: Device,
        to: Device,
    ) -> Result<Vec<Tensor>, FeedError>;
}
