//! Infinite incrementing sample source.

use crate::error::FeedError;
use crate::feed::descriptor::{static_dims, SourceDescriptor, SourceKind};
use crate::tensor::{DType, Tensor};

/// Source returning its current state, then incrementing every element by
/// one unit of the element type.
///
/// Never exhausts. Increments follow the element type's native arithmetic:
/// integer elements wrap around at the type boundary, floats saturate into
/// their usual rounding behaviour.
#[derive(Debug, Clone)]
pub struct CounterSource {
    start: Tensor,
    value: Tensor,
}

impl CounterSource {
    pub fn new(start: Tensor) -> Self {
        CounterSource {
            value: start.clone(),
            start,
        }
    }

    pub fn restart(&mut self) {
        self.value = self.start.clone();
    }

    pub fn next_sample(&mut self) -> Result<Option<Tensor>, FeedError> {
        let sample = self.value.clone();
        increment(&mut self.value);
        Ok(Some(sample))
    }

    pub fn descriptor(&self) -> SourceDescriptor {
        SourceDescriptor::new(
            self.start.dtype(),
            SourceKind::Counter,
            static_dims(self.start.shape().dims()),
        )
    }
}

fn increment(value: &mut Tensor) {
    match value.dtype() {
        DType::U8 => {
            for v in value.data_u8_mut() {
                *v = v.wrapping_add(1);
            }
        }
        DType::I32 => {
            for v in value.data_i32_mut() {
                *v = v.wrapping_add(1);
            }
        }
        DType::F32 => {
            for v in value.data_f32_mut() {
                *v += 1.0;
            }
        }
    }
}
