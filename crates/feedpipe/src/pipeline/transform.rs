//! The per-sample derive transform applied before padding.

use crate::tensor::{DType, Tensor};

/// Constant offset added to every raw element before the integer cast.
pub const DERIVE_OFFSET: i32 = 10;

/// Computes the derived counterpart of one raw sample:
/// `cast(raw + DERIVE_OFFSET)` to `I32`, shape preserved.
///
/// Float values truncate toward zero on the cast, matching `as i32`.
pub fn derive(raw: &Tensor) -> Tensor {
    let shape = raw.shape().clone();
    let data: Vec<i32> = match raw.dtype() {
        DType::U8 => raw
            .data_u8()
            .iter()
            .map(|&v| i32::from(v) + DERIVE_OFFSET)
            .collect(),
        DType::I32 => raw
            .data_i32()
            .iter()
            .map(|&v| v.wrapping_add(DERIVE_OFFSET))
            .collect(),
        DType::F32 => raw
            .data_f32()
            .iter()
            .map(|&v| (v + DERIVE_OFFSET as f32) as i32)
            .collect(),
    };
    Tensor::from_i32(shape, data).expect("derived payload matches the raw shape")
}
