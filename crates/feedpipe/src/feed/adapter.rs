//! Input slots: the binding between a placeholder name and its data supply.

use crate::engine::SampleQueue;
use crate::feed::descriptor::SourceDescriptor;
use crate::placement::Device;
use crate::source::Source;

/// Where one input's samples come from.
///
/// The two modes are distinct construction paths rather than a runtime flag:
/// eager slots own their source and are pulled synchronously, one sample per
/// pipeline iteration; deferred slots declare a name-only placeholder whose
/// data arrives from an externally built engine queue.
pub enum InputData<Q: SampleQueue> {
    Eager(Source),
    Deferred(Q),
}

/// One named pipeline input awaiting binding.
pub struct InputSlot<Q: SampleQueue> {
    name: String,
    device: Device,
    descriptor: SourceDescriptor,
    data: InputData<Q>,
    no_copy: Option<bool>,
}

impl<Q: SampleQueue> InputSlot<Q> {
    /// Declares an input fed directly from `source`. The shape/type
    /// declaration is taken from the source itself.
    pub fn eager(name: impl Into<String>, device: Device, source: Source) -> Self {
        let descriptor = source.descriptor();
        InputSlot {
            name: name.into(),
            device,
            descriptor,
            data: InputData::Eager(source),
            no_copy: None,
        }
    }

    /// Declares a name-only placeholder supplied by `queue`. The descriptor
    /// must be provided explicitly since no source is bound.
    pub fn deferred(
        name: impl Into<String>,
        device: Device,
        descriptor: SourceDescriptor,
        queue: Q,
    ) -> Self {
        InputSlot {
            name: name.into(),
            device,
            descriptor,
            data: InputData::Deferred(queue),
            no_copy: None,
        }
    }

    /// Forces the no-copy decision instead of deriving it from device
    /// equality. Forcing `true` across mismatched devices fails at bind time.
    pub fn with_no_copy(mut self, no_copy: bool) -> Self {
        self.no_copy = Some(no_copy);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Device the input's data enters on (the queue side of the boundary).
    pub fn device(&self) -> Device {
        self.device
    }

    pub fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    pub fn no_copy(&self) -> Option<bool> {
        self.no_copy
    }

    pub(crate) fn into_parts(self) -> (String, Device, SourceDescriptor, InputData<Q>, Option<bool>) {
        (
            self.name,
            self.device,
            self.descriptor,
            self.data,
            self.no_copy,
        )
    }
}
