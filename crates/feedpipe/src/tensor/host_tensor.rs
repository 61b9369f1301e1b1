//! Host-backed tensor used for samples, batches, and test fixtures.

use super::{dtype::DType, shape::Shape};
use anyhow::{bail, Result};
use std::mem::{size_of, ManuallyDrop};

/// Simple host-backed tensor holding one sample or one padded batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    dtype: DType,
    data: Vec<u8>,
}

impl Tensor {
    /// Constructs a `U8` tensor from raw values, validating the length against the shape.
    pub fn from_u8(shape: Shape, data: Vec<u8>) -> Result<Self> {
        if data.len() != shape.num_elements() {
            bail!(
                "tensor data length ({}) does not match shape {:?}",
                data.len(),
                shape.dims()
            );
        }
        Ok(Tensor {
            shape,
            dtype: DType::U8,
            data,
        })
    }

    /// Constructs an `I32` tensor, ensuring the payload matches the expected element count.
    pub fn from_i32(shape: Shape, data: Vec<i32>) -> Result<Self> {
        if data.len() != shape.num_elements() {
            bail!(
                "tensor data length ({}) does not match shape {:?}",
                data.len(),
                shape.dims()
            );
        }
        Ok(Tensor {
            shape,
            dtype: DType::I32,
            data: vec_into_bytes(data),
        })
    }

    /// Constructs an `F32` tensor, ensuring the payload matches the expected element count.
    pub fn from_f32(shape: Shape, data: Vec<f32>) -> Result<Self> {
        if data.len() != shape.num_elements() {
            bail!(
                "tensor data length ({}) does not match shape {:?}",
                data.len(),
                shape.dims()
            );
        }
        Ok(Tensor {
            shape,
            dtype: DType::F32,
            data: vec_into_bytes(data),
        })
    }

    /// Returns a zero-initialized tensor of the requested shape and dtype.
    ///
    /// Also serves as the type probe callers hand to adapters when only the
    /// element type matters, never the payload.
    pub fn zeros(shape: Shape, dtype: DType) -> Self {
        let bytes = shape.num_elements() * dtype.size_in_bytes();
        Tensor {
            shape,
            dtype,
            data: vec![0u8; bytes],
        }
    }

    /// Returns a `U8` tensor with every element set to `value`.
    pub fn full_u8(shape: Shape, value: u8) -> Self {
        let len = shape.num_elements();
        Tensor {
            shape,
            dtype: DType::U8,
            data: vec![value; len],
        }
    }

    /// Returns the total number of elements stored in the tensor.
    pub fn len(&self) -> usize {
        self.shape.num_elements()
    }

    /// Reports whether the tensor contains zero elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Provides access to the tensor shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the scalar dtype of the tensor payload.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Borrows the raw byte payload regardless of dtype.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutably borrows the raw byte payload regardless of dtype.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Borrows the underlying `u8` data slice, panicking if the dtype differs.
    pub fn data_u8(&self) -> &[u8] {
        match self.dtype {
            DType::U8 => &self.data,
            _ => panic!("tensor data is not stored as u8"),
        }
    }

    /// Mutably borrows the `u8` data slice, panicking if the dtype differs.
    pub fn data_u8_mut(&mut self) -> &mut [u8] {
        match self.dtype {
            DType::U8 => &mut self.data,
            _ => panic!("tensor data is not stored as mutable u8"),
        }
    }

    /// Borrows the underlying `i32` data slice, panicking if the dtype differs.
    pub fn data_i32(&self) -> &[i32] {
        match self.dtype {
            DType::I32 => bytes_as_slice::<i32>(&self.data),
            _ => panic!("tensor data is not stored as i32"),
        }
    }

    /// Mutably borrows the `i32` data slice, panicking if the dtype differs.
    pub fn data_i32_mut(&mut self) -> &mut [i32] {
        match self.dtype {
            DType::I32 => bytes_as_slice_mut::<i32>(&mut self.data),
            _ => panic!("tensor data is not stored as mutable i32"),
        }
    }

    /// Borrows the underlying `f32` data slice, panicking if the dtype differs.
    pub fn data_f32(&self) -> &[f32] {
        match self.dtype {
            DType::F32 => bytes_as_slice::<f32>(&self.data),
            _ => panic!("tensor data is not stored as f32"),
        }
    }

    /// Mutably borrows the `f32` data slice, panicking if the dtype differs.
    pub fn data_f32_mut(&mut self) -> &mut [f32] {
        match self.dtype {
            DType::F32 => bytes_as_slice_mut::<f32>(&mut self.data),
            _ => panic!("tensor data is not stored as mutable f32"),
        }
    }
}

/// Converts an owned vector into a raw byte buffer without copying.
fn vec_into_bytes<T>(data: Vec<T>) -> Vec<u8> {
    let mut data = ManuallyDrop::new(data);
    let ptr = data.as_mut_ptr() as *mut u8;
    let len = data.len() * size_of::<T>();
    let cap = data.capacity() * size_of::<T>();
    unsafe { Vec::from_raw_parts(ptr, len, cap) }
}

/// Views a byte slice as a typed slice, asserting that the layout matches.
fn bytes_as_slice<T>(bytes: &[u8]) -> &[T] {
    assert_eq!(
        bytes.len() % size_of::<T>(),
        0,
        "byte length {} is not a multiple of element size {}",
        bytes.len(),
        size_of::<T>()
    );
    unsafe { std::slice::from_raw_parts(bytes.as_ptr() as *const T, bytes.len() / size_of::<T>()) }
}

/// Views a mutable byte slice as a typed mutable slice, asserting the layout.
fn bytes_as_slice_mut<T>(bytes: &mut [u8]) -> &mut [T] {
    assert_eq!(
        bytes.len() % size_of::<T>(),
        0,
        "byte length {} is not a multiple of element size {}",
        bytes.len(),
        size_of::<T>()
    );
    unsafe {
        std::slice::from_raw_parts_mut(bytes.as_mut_ptr() as *mut T, bytes.len() / size_of::<T>())
    }
}
