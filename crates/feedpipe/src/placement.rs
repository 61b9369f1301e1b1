//! Device targets and the bind-time no-copy/transfer decision.

use crate::error::FeedError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compute device an input queue or pipeline stage is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Device {
    Cpu,
    Gpu,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu => write!(f, "gpu"),
        }
    }
}

/// How one input's data enters the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The pipeline reads the queue's memory in place. Legal only when the
    /// queue and the pipeline agree on the device.
    NoCopy,
    /// An explicit engine transfer is inserted between the queue and the
    /// pipeline entry point, once per input per batch pull.
    Transfer,
}

/// Resolves the placement for one input, once per (input, configuration)
/// pair at bind time. The decision is never re-evaluated per batch: flipping
/// it mid-stream would let the consumer observe memory about to be
/// overwritten by the next pull.
///
/// `no_copy` forces the decision: `Some(true)` demands in-place reads and is
/// a configuration error across mismatched devices, `Some(false)` always
/// copies, `None` picks no-copy exactly when the devices match.
pub fn resolve(
    input: &str,
    queue: Device,
    pipeline: Device,
    no_copy: Option<bool>,
) -> Result<Placement, FeedError> {
    match no_copy {
        Some(true) => {
            if queue == pipeline {
                Ok(Placement::NoCopy)
            } else {
                Err(FeedError::PlacementConfig {
                    input: input.to_string(),
                    queue,
                    pipeline,
                })
            }
        }
        Some(false) => Ok(Placement::Transfer),
        None => {
            if queue == pipeline {
                Ok(Placement::NoCopy)
            } else {
                Ok(Placement::Transfer)
            }
        }
    }
}
