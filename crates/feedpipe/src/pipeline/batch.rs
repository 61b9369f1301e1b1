//! Batch assembly: padding irregular samples into one uniform tensor.

use crate::error::FeedError;
use crate::tensor::{Shape, Tensor};
use anyhow::{bail, Result};

/// Fixed-size ordered group of samples padded to a common shape.
///
/// The padded tensor has shape `[batch_size, padded dims...]` where each
/// padded dim is the maximum extent observed in this batch along that axis.
/// Original per-sample shapes are retained so consumers can unpad exactly.
#[derive(Debug, Clone)]
pub struct Batch {
    data: Tensor,
    sample_shapes: Vec<Shape>,
}

impl Batch {
    /// Pads `samples` (all of one dtype and rank) into a uniform batch,
    /// filling the margin with zeros. Padding is computed from this batch
    /// alone; other inputs in the same pull pad independently.
    pub fn pad(input: &str, samples: Vec<Tensor>) -> Result<Self, FeedError> {
        if samples.is_empty() {
            return Err(FeedError::ShapeContract {
                input: input.to_string(),
                reason: "cannot assemble an empty batch".to_string(),
            });
        }
        let dtype = samples[0].dtype();
        let rank = samples[0].shape().rank();
        for sample in &samples[1..] {
            if sample.dtype() != dtype {
                return Err(FeedError::ShapeContract {
                    input: input.to_string(),
                    reason: format!(
                        "batch mixes dtypes {} and {}",
                        dtype,
                        sample.dtype()
                    ),
                });
            }
            if sample.shape().rank() != rank {
                return Err(FeedError::ShapeContract {
                    input: input.to_string(),
                    reason: format!(
                        "batch mixes ranks {} and {}",
                        rank,
                        sample.shape().rank()
                    ),
                });
            }
        }

        let mut padded_dims = vec![0usize; rank];
        for sample in &samples {
            for (axis, &dim) in sample.shape().dims().iter().enumerate() {
                padded_dims[axis] = padded_dims[axis].max(dim);
            }
        }

        let elem = dtype.size_in_bytes();
        let sample_stride: usize = padded_dims.iter().product::<usize>() * elem;
        let mut batch_dims = Vec::with_capacity(rank + 1);
        batch_dims.push(samples.len());
        batch_dims.extend_from_slice(&padded_dims);
        let mut data = Tensor::zeros(Shape::new(batch_dims), dtype);

        let mut sample_shapes = Vec::with_capacity(samples.len());
        {
            let bytes = data.bytes_mut();
            for (index, sample) in samples.iter().enumerate() {
                let dst = &mut bytes[index * sample_stride..(index + 1) * sample_stride];
                copy_block(
                    sample.bytes(),
                    sample.shape().dims(),
                    dst,
                    &padded_dims,
                    sample.shape().dims(),
                    elem,
                );
            }
        }
        for sample in samples {
            sample_shapes.push(sample.shape().clone());
        }

        Ok(Batch {
            data,
            sample_shapes,
        })
    }

    /// Number of samples in the batch.
    pub fn batch_size(&self) -> usize {
        self.sample_shapes.len()
    }

    /// The uniform padded tensor, shape `[batch_size, padded dims...]`.
    pub fn data(&self) -> &Tensor {
        &self.data
    }

    /// Original shape of every sample, in delivery order.
    pub fn sample_shapes(&self) -> &[Shape] {
        &self.sample_shapes
    }

    /// Extracts sample `index` at its original shape, undoing the padding.
    pub fn unpad(&self, index: usize) -> Result<Tensor> {
        if index >= self.sample_shapes.len() {
            bail!(
                "sample index {} out of range for batch of {}",
                index,
                self.sample_shapes.len()
            );
        }
        let shape = self.sample_shapes[index].clone();
        let padded_dims = &self.data.shape().dims()[1..];
        let elem = self.data.dtype().size_in_bytes();
        let sample_stride: usize = padded_dims.iter().product::<usize>() * elem;

        let mut out = Tensor::zeros(shape.clone(), self.data.dtype());
        let src = &self.data.bytes()[index * sample_stride..(index + 1) * sample_stride];
        {
            let dst = out.bytes_mut();
            copy_block(src, padded_dims, dst, shape.dims(), shape.dims(), elem);
        }
        Ok(out)
    }
}

/// Copies a row-major block of extents `block` from `src` (laid out with
/// `src_dims`) into `dst` (laid out with `dst_dims`). `block` must not exceed
/// either layout along any axis.
fn copy_block(
    src: &[u8],
    src_dims: &[usize],
    dst: &mut [u8],
    dst_dims: &[usize],
    block: &[usize],
    elem: usize,
) {
    if block.len() == 1 {
        let n = block[0] * elem;
        dst[..n].copy_from_slice(&src[..n]);
        return;
    }
    let src_stride: usize = src_dims[1..].iter().product::<usize>() * elem;
    let dst_stride: usize = dst_dims[1..].iter().product::<usize>() * elem;
    for i in 0..block[0] {
        copy_block(
            &src[i * src_stride..(i + 1) * src_stride],
            &src_dims[1..],
            &mut dst[i * dst_stride..(i + 1) * dst_stride],
            &dst_dims[1..],
            &block[1..],
            elem,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::DType;

    #[test]
    fn pad_places_each_sample_at_the_origin() {
        let a = Tensor::from_u8(Shape::new(vec![2, 2]), vec![1, 2, 3, 4]).unwrap();
        let b = Tensor::from_u8(Shape::new(vec![1, 3]), vec![7, 8, 9]).unwrap();
        let batch = Batch::pad("input", vec![a, b]).unwrap();

        assert_eq!(batch.data().shape().dims(), &[2, 2, 3]);
        // Sample 0 occupies rows 0..2, cols 0..2; the rest is zero margin.
        assert_eq!(
            batch.data().data_u8(),
            &[1, 2, 0, 3, 4, 0, 0, 0, 0, 7, 8, 9, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn unpad_recovers_the_original_sample() {
        let a = Tensor::from_i32(Shape::new(vec![2, 2]), vec![1, 2, 3, 4]).unwrap();
        let b = Tensor::from_i32(Shape::new(vec![3, 1]), vec![5, 6, 7]).unwrap();
        let batch = Batch::pad("input", vec![a.clone(), b.clone()]).unwrap();

        assert_eq!(batch.unpad(0).unwrap(), a);
        assert_eq!(batch.unpad(1).unwrap(), b);
        assert!(batch.unpad(2).is_err());
    }

    #[test]
    fn pad_rejects_mixed_dtypes() {
        let a = Tensor::from_u8(Shape::new(vec![2]), vec![1, 2]).unwrap();
        let b = Tensor::from_i32(Shape::new(vec![2]), vec![1, 2]).unwrap();
        let err = Batch::pad("input", vec![a, b]).unwrap_err();
        assert!(matches!(err, FeedError::ShapeContract { .. }));
    }

    #[test]
    fn pad_handles_rank_one_samples() {
        let a = Tensor::from_u8(Shape::new(vec![3]), vec![1, 2, 3]).unwrap();
        let b = Tensor::from_u8(Shape::new(vec![1]), vec![9]).unwrap();
        let batch = Batch::pad("input", vec![a, b]).unwrap();
        assert_eq!(batch.data().shape().dims(), &[2, 3]);
        assert_eq!(batch.data().data_u8(), &[1, 2, 3, 9, 0, 0]);
        assert_eq!(batch.unpad(1).unwrap().data_u8(), &[9]);
    }

    #[test]
    fn pad_handles_equal_dtype_shapes_without_margin() {
        let a = Tensor::zeros(Shape::new(vec![2, 2]), DType::F32);
        let b = Tensor::zeros(Shape::new(vec![2, 2]), DType::F32);
        let batch = Batch::pad("input", vec![a, b]).unwrap();
        assert_eq!(batch.data().shape().dims(), &[2, 2, 2]);
    }
}
