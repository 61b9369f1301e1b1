//! Engine wrapper that records transfer invocations.

use feedpipe::engine::FeedEngine;
use feedpipe::error::FeedError;
use feedpipe::placement::Device;
use feedpipe::source::Source;
use feedpipe::tensor::Tensor;
use feedpipe_engine_host::HostEngine;
use std::sync::Mutex;

/// One observed transfer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRecord {
    pub from: Device,
    pub to: Device,
    pub samples: usize,
}

/// Test-only engine delegating to [`HostEngine`] while counting every
/// transfer, so placement decisions become observable.
#[derive(Default)]
pub struct RecordingEngine {
    inner: HostEngine,
    transfers: Mutex<Vec<TransferRecord>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.lock().expect("engine mutex poisoned").len()
    }

    pub fn recorded_transfers(&self) -> Vec<TransferRecord> {
        self.transfers
            .lock()
            .expect("engine mutex poisoned")
            .clone()
    }
}

impl FeedEngine for RecordingEngine {
    type Queue = <HostEngine as FeedEngine>::Queue;

    fn engine_name(&self) -> &str {
        "recording"
    }

    fn source_queue(
        &self,
        source: Source,
        device: Device,
        capacity: usize,
    ) -> Result<Self::Queue, FeedError> {
        self.inner.source_queue(source, device, capacity)
    }

    fn value_queue(&self, value: Tensor, device: Device) -> Result<Self::Queue, FeedError> {
        self.inner.value_queue(value, device)
    }

    fn transfer(
        &self,
        samples: Vec<Tensor>,
        from: Device,
        to: Device,
    ) -> Result<Vec<Tensor>, FeedError> {
        self.transfers
            .lock()
            .expect("engine mutex poisoned")
            .push(TransferRecord {
                from,
                to,
                samples: samples.len(),
            });
        self.inner.transfer(samples, from, to)
    }
}
