//! Bounded-random sample source with an explicit owned generator.

use crate::error::FeedError;
use crate::feed::descriptor::{static_dims, SourceDescriptor, SourceKind};
use crate::tensor::{DType, Shape, Tensor};
use anyhow::{ensure, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source drawing randomly shaped, randomly filled samples within a
/// `[min_shape, max_shape]` envelope.
///
/// The generator is owned and reseeded on every `restart`, so the same
/// (seed, bounds) always reproduces the same sample sequence and concurrent
/// bindings never interfere through shared random state.
#[derive(Debug)]
pub struct RandomSource {
    dtype: DType,
    max_shape: Vec<usize>,
    min_shape: Option<Vec<usize>>,
    seed: u64,
    stop: Option<u64>,
    produced: u64,
    rng: StdRng,
}

impl RandomSource {
    /// Creates an effectively unbounded source over `max_shape` with the
    /// default lower bound of one element per axis.
    pub fn new(max_shape: Vec<usize>, dtype: DType, seed: u64) -> Result<Self> {
        ensure!(
            !max_shape.is_empty(),
            "random source requires at least one axis"
        );
        ensure!(
            max_shape.iter().all(|&d| d > 0),
            "random source maximum shape must have positive extents, got {:?}",
            max_shape
        );
        Ok(RandomSource {
            dtype,
            max_shape,
            min_shape: None,
            seed,
            stop: None,
            produced: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Constrains the smallest shape drawn per axis.
    pub fn with_min_shape(mut self, min_shape: Vec<usize>) -> Result<Self> {
        ensure!(
            min_shape.len() == self.max_shape.len(),
            "minimum shape rank {} does not match maximum shape rank {}",
            min_shape.len(),
            self.max_shape.len()
        );
        ensure!(
            min_shape
                .iter()
                .zip(self.max_shape.iter())
                .all(|(lo, hi)| lo <= hi),
            "minimum shape {:?} exceeds maximum shape {:?}",
            min_shape,
            self.max_shape
        );
        self.min_shape = Some(min_shape);
        Ok(self)
    }

    /// Bounds the sequence: counting from zero, samples numbered `0..=stop`
    /// succeed and the next call signals end-of-sequence.
    pub fn with_stop(mut self, stop: u64) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn restart(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
    }

    pub fn next_sample(&mut self) -> Result<Option<Tensor>, FeedError> {
        if let Some(stop) = self.stop {
            if self.produced > stop {
                return Ok(None);
            }
        }
        self.produced += 1;

        let mut dims = Vec::with_capacity(self.max_shape.len());
        for (axis, &hi) in self.max_shape.iter().enumerate() {
            let lo = self.min_shape.as_ref().map(|min| min[axis]).unwrap_or(1);
            dims.push(self.rng.gen_range(lo..=hi));
        }
        let shape = Shape::new(dims);
        let sample = self.fill(shape);
        // The drawn shape and the declared envelope share the same bounds,
        // but a misconfigured generator must surface as a contract breach.
        self.descriptor().check_sample("random", &sample)?;
        Ok(Some(sample))
    }

    pub fn descriptor(&self) -> SourceDescriptor {
        let descriptor = SourceDescriptor::new(
            self.dtype,
            SourceKind::Random {
                seed: self.seed,
                stop: self.stop,
            },
            static_dims(&self.max_shape),
        );
        match &self.min_shape {
            Some(min_shape) => descriptor.with_min_shape(min_shape.clone()),
            None => descriptor,
        }
    }

    fn fill(&mut self, shape: Shape) -> Tensor {
        let len = shape.num_elements();
        match self.dtype {
            DType::U8 => {
                let data: Vec<u8> = (0..len).map(|_| self.rng.gen()).collect();
                Tensor::from_u8(shape, data).expect("length follows from the shape")
            }
            DType::I32 => {
                let data: Vec<i32> = (0..len).map(|_| self.rng.gen()).collect();
                Tensor::from_i32(shape, data).expect("length follows from the shape")
            }
            DType::F32 => {
                let data: Vec<f32> = (0..len).map(|_| self.rng.gen()).collect();
                Tensor::from_f32(shape, data).expect("length follows from the shape")
            }
        }
    }
}
