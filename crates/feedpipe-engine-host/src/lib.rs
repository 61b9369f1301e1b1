//! Reference execution engine backing the feedpipe protocol on host threads.

pub mod host;

pub use host::{HostEngine, HostQueue};
