//! Binding state machine and the feed-to-pipeline construction contract.

use crate::engine::{FeedEngine, SampleQueue};
use crate::error::FeedError;
use crate::feed::adapter::{InputData, InputSlot};
use crate::feed::descriptor::{Dim, FeedSignature, SourceDescriptor};
use crate::pipeline::batch::Batch;
use crate::pipeline::transform;
use crate::placement::{self, Device, Placement};
use crate::tensor::{DType, Tensor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Pipeline-wide configuration fixed at bind time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub batch_size: usize,
    /// Worker-thread count of the consuming pipeline. Opaque to the feed
    /// core; engines typically use it to size queue prefetch depth.
    pub num_threads: usize,
    pub device: Device,
    pub device_id: usize,
    pub shard_id: usize,
    pub num_shards: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            batch_size: 1,
            num_threads: 1,
            device: Device::Cpu,
            device_id: 0,
            shard_id: 0,
            num_shards: 1,
        }
    }
}

/// Lifecycle of a pipeline binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Unbound,
    Bound,
    Running,
    Exhausted,
    Closed,
}

impl fmt::Display for BindingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingState::Unbound => write!(f, "unbound"),
            BindingState::Bound => write!(f, "bound"),
            BindingState::Running => write!(f, "running"),
            BindingState::Exhausted => write!(f, "exhausted"),
            BindingState::Closed => write!(f, "closed"),
        }
    }
}

struct BoundInput<Q: SampleQueue> {
    name: String,
    device: Device,
    descriptor: SourceDescriptor,
    data: InputData<Q>,
    placement: Placement,
}

impl<Q: SampleQueue> BoundInput<Q> {
    fn next_sample(&mut self) -> Result<Option<Tensor>, FeedError> {
        match &mut self.data {
            InputData::Eager(source) => source.next_sample(),
            InputData::Deferred(queue) => queue.pull(),
        }
    }
}

/// Runnable feed bound to one (batch size, thread count, device, device id)
/// configuration.
///
/// Each pull delivers, per input, one raw batch and one derived batch, both
/// padded to the largest shape observed in that batch. Outputs keep the
/// fixed order `[raw inputs..., derived inputs...]`.
pub struct PipelineBinding<E: FeedEngine> {
    engine: Arc<E>,
    options: PipelineOptions,
    inputs: Vec<BoundInput<E::Queue>>,
    signatures: Vec<FeedSignature>,
    state: BindingState,
}

impl<E: FeedEngine> PipelineBinding<E> {
    /// Validates the declared inputs and produces a bound pipeline.
    ///
    /// Placement is resolved here, once per input, and never re-evaluated
    /// per batch. Eager sources are restarted so iteration begins from a
    /// fresh state.
    pub fn bind(
        engine: Arc<E>,
        slots: Vec<InputSlot<E::Queue>>,
        options: PipelineOptions,
    ) -> Result<Self, FeedError> {
        if options.batch_size == 0 {
            return Err(FeedError::Config("batch size must be at least 1".into()));
        }
        if options.num_shards == 0 {
            return Err(FeedError::Config("shard count must be at least 1".into()));
        }
        if options.shard_id >= options.num_shards {
            return Err(FeedError::Config(format!(
                "shard id {} out of range for {} shards",
                options.shard_id, options.num_shards
            )));
        }
        if slots.is_empty() {
            return Err(FeedError::Config(
                "a pipeline binding needs at least one input".into(),
            ));
        }

        let mut seen = HashSet::new();
        for slot in &slots {
            if slot.name().is_empty() {
                return Err(FeedError::Config("input names must be non-empty".into()));
            }
            if !seen.insert(slot.name().to_string()) {
                return Err(FeedError::Config(format!(
                    "duplicate input name '{}'",
                    slot.name()
                )));
            }
        }

        let mut inputs = Vec::with_capacity(slots.len());
        for slot in slots {
            let (name, device, descriptor, mut data, no_copy) = slot.into_parts();
            let queue_device = match &data {
                InputData::Eager(_) => device,
                InputData::Deferred(queue) => queue.device(),
            };
            let placement = placement::resolve(&name, queue_device, options.device, no_copy)?;
            if let InputData::Eager(source) = &mut data {
                source.restart();
            }
            inputs.push(BoundInput {
                name,
                device: queue_device,
                descriptor,
                data,
                placement,
            });
        }

        let signatures = declared_signatures(&inputs, options.batch_size);

        Ok(PipelineBinding {
            engine,
            options,
            inputs,
            signatures,
            state: BindingState::Bound,
        })
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Declared output signatures in fixed order: raw inputs, then derived.
    pub fn signatures(&self) -> &[FeedSignature] {
        &self.signatures
    }

    /// Declared output shapes, batch axis first.
    pub fn shapes(&self) -> Vec<Vec<Dim>> {
        self.signatures.iter().map(|s| s.dims.clone()).collect()
    }

    /// Declared output dtypes, matching [`shapes`](Self::shapes) order.
    pub fn dtypes(&self) -> Vec<DType> {
        self.signatures.iter().map(|s| s.dtype).collect()
    }

    pub fn input_names(&self) -> Vec<&str> {
        self.inputs.iter().map(|input| input.name.as_str()).collect()
    }

    /// Resolved placement for the named input, fixed since bind time.
    pub fn placement(&self, name: &str) -> Option<Placement> {
        self.inputs
            .iter()
            .find(|input| input.name == name)
            .map(|input| input.placement)
    }

    /// Pulls one batch per declared output.
    ///
    /// All-or-nothing: a batch is delivered only when every input yielded
    /// `batch_size` samples. The first end-of-sequence from any input moves
    /// the binding to Exhausted and returns `Ok(None)`, discarding whatever
    /// was collected for this pull.
    pub fn pull(&mut self) -> Result<Option<Vec<Batch>>, FeedError> {
        match self.state {
            BindingState::Closed | BindingState::Unbound => {
                return Err(FeedError::BindingState {
                    op: "pull",
                    state: self.state,
                });
            }
            BindingState::Exhausted => return Ok(None),
            BindingState::Bound => self.state = BindingState::Running,
            BindingState::Running => {}
        }

        let batch_size = self.options.batch_size;
        let pipeline_device = self.options.device;
        let per_input = match self.collect_batches(batch_size, pipeline_device) {
            Ok(Some(per_input)) => per_input,
            Ok(None) => {
                // Normal termination: discard the partial pull, free buffers.
                self.state = BindingState::Exhausted;
                self.inputs.clear();
                return Ok(None);
            }
            Err(err) => {
                self.state = BindingState::Closed;
                self.inputs.clear();
                return Err(err);
            }
        };

        let mut outputs = Vec::with_capacity(self.inputs.len() * 2);
        for (input, samples) in self.inputs.iter().zip(per_input.iter()) {
            outputs.push(Batch::pad(&input.name, samples.clone())?);
        }
        for (input, samples) in self.inputs.iter().zip(per_input.into_iter()) {
            let derived: Vec<_> = samples.iter().map(transform::derive).collect();
            outputs.push(Batch::pad(&input.name, derived)?);
        }
        Ok(Some(outputs))
    }

    /// Gathers `batch_size` checked samples for every input, applying the
    /// per-input transfer step once per pull. `Ok(None)` signals that some
    /// input reached end-of-sequence mid-collection.
    fn collect_batches(
        &mut self,
        batch_size: usize,
        pipeline_device: Device,
    ) -> Result<Option<Vec<Vec<Tensor>>>, FeedError> {
        let mut per_input = Vec::with_capacity(self.inputs.len());
        for input in &mut self.inputs {
            let mut samples = Vec::with_capacity(batch_size);
            while samples.len() < batch_size {
                match input.next_sample()? {
                    Some(sample) => {
                        input.descriptor.check_sample(&input.name, &sample)?;
                        samples.push(sample);
                    }
                    None => return Ok(None),
                }
            }
            if input.placement == Placement::Transfer {
                samples = self
                    .engine
                    .transfer(samples, input.device, pipeline_device)?;
            }
            per_input.push(samples);
        }
        Ok(Some(per_input))
    }

    /// Tears the binding down, dropping queues and sources so producer
    /// threads unwind without blocking. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.state = BindingState::Closed;
        self.inputs.clear();
    }
}

/// Process-boundary construction contract: builds the binding and returns it
/// alongside the declared output shape and dtype tuples.
pub fn build_feed<E: FeedEngine>(
    engine: Arc<E>,
    inputs: Vec<InputSlot<E::Queue>>,
    options: PipelineOptions,
) -> Result<(PipelineBinding<E>, Vec<Vec<Dim>>, Vec<DType>), FeedError> {
    let binding = PipelineBinding::bind(engine, inputs, options)?;
    let shapes = binding.shapes();
    let dtypes = binding.dtypes();
    Ok((binding, shapes, dtypes))
}

fn declared_signatures<Q: SampleQueue>(
    inputs: &[BoundInput<Q>],
    batch_size: usize,
) -> Vec<FeedSignature> {
    let mut signatures = Vec::with_capacity(inputs.len() * 2);
    for input in inputs {
        signatures.push(FeedSignature::batched(
            batch_size,
            input.descriptor.rank(),
            input.descriptor.dtype(),
        ));
    }
    for input in inputs {
        signatures.push(FeedSignature::batched(
            batch_size,
            input.descriptor.rank(),
            DType::I32,
        ));
    }
    signatures
}
