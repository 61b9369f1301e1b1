//! Shared test support for feedpipe execution engines.

pub mod recording;
pub mod scenarios;

pub use recording::{RecordingEngine, TransferRecord};

/// Instantiates the engine conformance scenarios as `#[test]` functions for
/// one engine constructor.
#[macro_export]
macro_rules! define_engine_tests {
    ($module:ident, $engine_ctor:expr) => {
        #[cfg(test)]
        mod $module {
            use super::*;

            use $crate::scenarios;

            #[test]
            fn constant_queue_repeats_its_value() {
                let engine = ($engine_ctor)();
                scenarios::constant_queue_repeats_its_value(&engine);
            }

            #[test]
            fn source_queue_preserves_sample_order() {
                let engine = ($engine_ctor)();
                scenarios::source_queue_preserves_sample_order(&engine);
            }

            #[test]
            fn source_queue_signals_end_of_sequence() {
                let engine = ($engine_ctor)();
                scenarios::source_queue_signals_end_of_sequence(&engine);
            }

            #[test]
            fn transfer_copies_contents_exactly() {
                let engine = ($engine_ctor)();
                scenarios::transfer_copies_contents_exactly(&engine);
            }

            #[test]
            fn dropping_a_backpressured_queue_does_not_hang() {
                let engine = ($engine_ctor)();
                scenarios::dropping_a_backpressured_queue_does_not_hang(&engine);
            }
        }
    };
}
