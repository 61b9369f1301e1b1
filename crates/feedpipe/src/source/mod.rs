//! Sample sources: restartable producers of single, possibly irregularly
//! shaped samples of a fixed element type.
//!
//! The set of source kinds is closed on purpose. New kinds extend the enum
//! explicitly instead of hiding behind open-ended dynamic dispatch, and each
//! variant owns its entire iteration state so two bindings never share a
//! generator.

pub mod counter;
pub mod fixed;
pub mod random;

pub use counter::CounterSource;
pub use fixed::FixedSource;
pub use random::RandomSource;

use crate::error::FeedError;
use crate::feed::descriptor::SourceDescriptor;
use crate::tensor::Tensor;

/// Closed set of sample source variants behind one produce-next capability.
#[derive(Debug)]
pub enum Source {
    Fixed(FixedSource),
    Random(RandomSource),
    Counter(CounterSource),
}

impl Source {
    /// Resets the iteration state, as if the source were freshly constructed.
    pub fn restart(&mut self) {
        match self {
            Source::Fixed(source) => source.restart(),
            Source::Random(source) => source.restart(),
            Source::Counter(source) => source.restart(),
        }
    }

    /// Produces the next sample, or `Ok(None)` once a bounded source is
    /// exhausted. Exhaustion is normal termination, never a fault.
    pub fn next_sample(&mut self) -> Result<Option<Tensor>, FeedError> {
        match self {
            Source::Fixed(source) => source.next_sample(),
            Source::Random(source) => source.next_sample(),
            Source::Counter(source) => source.next_sample(),
        }
    }

    /// Immutable declaration of what this source will produce.
    pub fn descriptor(&self) -> SourceDescriptor {
        match self {
            Source::Fixed(source) => source.descriptor(),
            Source::Random(source) => source.descriptor(),
            Source::Counter(source) => source.descriptor(),
        }
    }
}

impl From<FixedSource> for Source {
    fn from(source: FixedSource) -> Self {
        Source::Fixed(source)
    }
}

impl From<RandomSource> for Source {
    fn from(source: RandomSource) -> Self {
        Source::Random(source)
    }
}

impl From<CounterSource> for Source {
    fn from(source: CounterSource) -> Self {
        Source::Counter(source)
    }
}
