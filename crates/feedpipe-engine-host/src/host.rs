//! Host-threaded queues and simulated device transfers.
//!
//! Devices are simulated: a queue carries a device tag and a transfer is a
//! byte copy that retags the destination. That is enough to exercise the
//! placement contract, which only observes whether a transfer happened.

use feedpipe::engine::{FeedEngine, SampleQueue};
use feedpipe::error::FeedError;
use feedpipe::placement::Device;
use feedpipe::source::Source;
use feedpipe::tensor::Tensor;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

/// Reference engine: one producer thread per source queue, bounded handoff.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostEngine;

impl HostEngine {
    pub fn new() -> Self {
        HostEngine
    }
}

enum QueueKind {
    /// Repeats a constant value forever.
    Constant(Tensor),
    /// Pulls from a producer thread through a bounded channel.
    Producer {
        rx: Option<Receiver<Result<Tensor, FeedError>>>,
        handle: Option<thread::JoinHandle<()>>,
    },
}

/// Pull-based sample queue delivered by [`HostEngine`].
pub struct HostQueue {
    device: Device,
    kind: QueueKind,
}

impl HostQueue {
    fn constant(value: Tensor, device: Device) -> Self {
        HostQueue {
            device,
            kind: QueueKind::Constant(value),
        }
    }

    fn producer(mut source: Source, device: Device, capacity: usize) -> Self {
        let (tx, rx): (SyncSender<Result<Tensor, FeedError>>, _) =
            mpsc::sync_channel(capacity.max(1));
        let handle = thread::spawn(move || {
            source.restart();
            loop {
                match source.next_sample() {
                    Ok(Some(sample)) => {
                        if tx.send(Ok(sample)).is_err() {
                            // Consumer went away; stop producing.
                            return;
                        }
                    }
                    Ok(None) => return,
                    Err(err) => {
                        let _ = tx.send(Err(err));
                        return;
                    }
                }
            }
        });
        HostQueue {
            device,
            kind: QueueKind::Producer {
                rx: Some(rx),
                handle: Some(handle),
            },
        }
    }
}

impl SampleQueue for HostQueue {
    fn device(&self) -> Device {
        self.device
    }

    fn pull(&mut self) -> Result<Option<Tensor>, FeedError> {
        match &mut self.kind {
            QueueKind::Constant(value) => Ok(Some(value.clone())),
            QueueKind::Producer { rx, .. } => match rx {
                Some(receiver) => match receiver.recv() {
                    Ok(Ok(sample)) => Ok(Some(sample)),
                    Ok(Err(err)) => Err(err),
                    // Sender dropped: the producer finished its sequence.
                    Err(_) => Ok(None),
                },
                None => Ok(None),
            },
        }
    }
}

impl Drop for HostQueue {
    fn drop(&mut self) {
        if let QueueKind::Producer { rx, handle } = &mut self.kind {
            // Disconnect first so a producer blocked on a full channel
            // observes the hangup instead of deadlocking the join.
            drop(rx.take());
            if let Some(handle) = handle.take() {
                let _ = handle.join();
            }
        }
    }
}

impl FeedEngine for HostEngine {
    type Queue = HostQueue;

    fn engine_name(&self) -> &str {
        "host"
    }

    fn source_queue(
        &self,
        source: Source,
        device: Device,
        capacity: usize,
    ) -> Result<Self::Queue, FeedError> {
        Ok(HostQueue::producer(source, device, capacity))
    }

    fn value_queue(&self, value: Tensor, device: Device) -> Result<Self::Queue, FeedError> {
        Ok(HostQueue::constant(value, device))
    }

    fn transfer(
        &self,
        samples: Vec<Tensor>,
        _from: Device,
        _to: Device,
    ) -> Result<Vec<Tensor>, FeedError> {
        // Clone allocates fresh host memory, standing in for the cross
        // device copy.
        Ok(samples.iter().map(Tensor::clone).collect())
    }
}
