use feedpipe::engine::{FeedEngine, SampleQueue};
use feedpipe::placement::Device;
use feedpipe::source::{RandomSource, Source};
use feedpipe::tensor::{DType, Shape, Tensor};
use feedpipe_engine_host::HostEngine;
use feedpipe_engine_tests::define_engine_tests;

define_engine_tests!(conformance, HostEngine::new);

#[test]
fn producer_queue_replays_a_seeded_source() {
    let engine = HostEngine::new();
    let make_source = || {
        Source::from(
            RandomSource::new(vec![8, 8], DType::U8, 77)
                .expect("valid bounds")
                .with_stop(9),
        )
    };

    let drain = |mut queue: <HostEngine as FeedEngine>::Queue| {
        let mut samples = Vec::new();
        while let Some(sample) = queue.pull().expect("pull never fails") {
            samples.push(sample);
        }
        samples
    };

    let first = drain(
        engine
            .source_queue(make_source(), Device::Cpu, 4)
            .expect("queue should build"),
    );
    let second = drain(
        engine
            .source_queue(make_source(), Device::Cpu, 4)
            .expect("queue should build"),
    );
    assert_eq!(first.len(), 10);
    assert_eq!(first, second);
}

#[test]
fn transfer_returns_distinct_allocations() {
    let engine = HostEngine::new();
    let sample = Tensor::from_u8(Shape::new(vec![4]), vec![1, 2, 3, 4]).unwrap();
    let moved = engine
        .transfer(vec![sample.clone()], Device::Cpu, Device::Gpu)
        .expect("transfer should succeed");
    assert_eq!(moved[0], sample);
    assert_ne!(
        moved[0].bytes().as_ptr(),
        sample.bytes().as_ptr(),
        "a transfer must copy, not alias"
    );
}

#[test]
fn queue_reports_its_device() {
    let engine = HostEngine::new();
    let queue = engine
        .value_queue(Tensor::full_u8(Shape::new(vec![1]), 0), Device::Gpu)
        .expect("queue should build");
    assert_eq!(queue.device(), Device::Gpu);
}
