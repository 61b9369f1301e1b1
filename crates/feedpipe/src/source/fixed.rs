//! Constant sample source.

use crate::error::FeedError;
use crate::feed::descriptor::{static_dims, SourceDescriptor, SourceKind};
use crate::tensor::Tensor;

/// Source that returns the same stored value forever.
#[derive(Debug, Clone)]
pub struct FixedSource {
    value: Tensor,
}

impl FixedSource {
    pub fn new(value: Tensor) -> Self {
        FixedSource { value }
    }

    pub fn restart(&mut self) {}

    pub fn next_sample(&mut self) -> Result<Option<Tensor>, FeedError> {
        Ok(Some(self.value.clone()))
    }

    pub fn descriptor(&self) -> SourceDescriptor {
        SourceDescriptor::new(
            self.value.dtype(),
            SourceKind::Fixed,
            static_dims(self.value.shape().dims()),
        )
    }
}
