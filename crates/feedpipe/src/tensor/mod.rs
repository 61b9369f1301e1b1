//! Host-side tensor model shared by sources, queues, and the feed pipeline.

pub mod dtype;
pub mod host_tensor;
pub mod shape;

pub use dtype::DType;
pub use host_tensor::Tensor;
pub use shape::Shape;
