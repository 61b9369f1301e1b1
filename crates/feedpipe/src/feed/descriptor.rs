//! Shape/type declarations exchanged across the feed boundary.

use crate::error::FeedError;
use crate::tensor::{DType, Tensor};
use serde::{Deserialize, Serialize};

/// One declared dimension: statically known or left to vary per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dim {
    Static(usize),
    Dynamic,
}

/// Declared shape and dtype of one pipeline output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSignature {
    pub dims: Vec<Dim>,
    pub dtype: DType,
}

impl FeedSignature {
    /// Declares a batch output: a static leading batch axis followed by one
    /// dynamic axis per sample dimension.
    pub fn batched(batch_size: usize, sample_rank: usize, dtype: DType) -> Self {
        let mut dims = Vec::with_capacity(sample_rank + 1);
        dims.push(Dim::Static(batch_size));
        dims.extend(std::iter::repeat(Dim::Dynamic).take(sample_rank));
        FeedSignature { dims, dtype }
    }
}

/// Which kind of source feeds an input, with kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Constant tensor repeated forever.
    Fixed,
    /// Deterministic randomly-shaped sequence.
    Random { seed: u64, stop: Option<u64> },
    /// Monotonically incrementing state, never exhausted.
    Counter,
    /// Name-only placeholder; data arrives from an external queue.
    External,
}

/// Immutable declaration of one input's element type and shape envelope.
///
/// Created once at adapter construction; every sample the input later yields
/// is checked against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    dtype: DType,
    kind: SourceKind,
    max_shape: Vec<Dim>,
    min_shape: Option<Vec<usize>>,
}

impl SourceDescriptor {
    pub fn new(dtype: DType, kind: SourceKind, max_shape: Vec<Dim>) -> Self {
        SourceDescriptor {
            dtype,
            kind,
            max_shape,
            min_shape: None,
        }
    }

    /// Declares an external input from a type probe: a zero-valued tensor
    /// passed purely for its element type and rank, never for its payload.
    /// Every axis is left dynamic.
    pub fn from_probe(probe: &Tensor) -> Self {
        SourceDescriptor {
            dtype: probe.dtype(),
            kind: SourceKind::External,
            max_shape: vec![Dim::Dynamic; probe.shape().rank()],
            min_shape: None,
        }
    }

    /// Adds a lower shape bound checked alongside the maximum envelope.
    pub fn with_min_shape(mut self, min_shape: Vec<usize>) -> Self {
        self.min_shape = Some(min_shape);
        self
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// Declared maximum shape envelope; `Dynamic` axes are unbounded.
    pub fn max_shape(&self) -> &[Dim] {
        &self.max_shape
    }

    pub fn min_shape(&self) -> Option<&[usize]> {
        self.min_shape.as_deref()
    }

    /// Rank every sample of this input must have.
    pub fn rank(&self) -> usize {
        self.max_shape.len()
    }

    /// Checks one produced sample against the declaration.
    ///
    /// A violation here means a misbehaving source, never recoverable data:
    /// oversized shapes are rejected rather than clamped, and dtype
    /// mismatches are rejected rather than coerced.
    pub fn check_sample(&self, input: &str, sample: &Tensor) -> Result<(), FeedError> {
        if sample.dtype() != self.dtype {
            return Err(FeedError::ShapeContract {
                input: input.to_string(),
                reason: format!(
                    "sample dtype {} does not match declared dtype {}",
                    sample.dtype(),
                    self.dtype
                ),
            });
        }
        let dims = sample.shape().dims();
        if dims.len() != self.max_shape.len() {
            return Err(FeedError::ShapeContract {
                input: input.to_string(),
                reason: format!(
                    "sample rank {} does not match declared rank {}",
                    dims.len(),
                    self.max_shape.len()
                ),
            });
        }
        for (axis, (&dim, bound)) in dims.iter().zip(self.max_shape.iter()).enumerate() {
            if let Dim::Static(max) = bound {
                if dim > *max {
                    return Err(FeedError::ShapeContract {
                        input: input.to_string(),
                        reason: format!(
                            "axis {axis} has extent {dim}, exceeding the declared maximum {max}"
                        ),
                    });
                }
            }
        }
        if let Some(min_shape) = &self.min_shape {
            for (axis, (&dim, &min)) in dims.iter().zip(min_shape.iter()).enumerate() {
                if dim < min {
                    return Err(FeedError::ShapeContract {
                        input: input.to_string(),
                        reason: format!(
                            "axis {axis} has extent {dim}, below the declared minimum {min}"
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Declares an envelope of entirely static bounds.
pub(crate) fn static_dims(dims: &[usize]) -> Vec<Dim> {
    dims.iter().map(|&d| Dim::Static(d)).collect()
}
