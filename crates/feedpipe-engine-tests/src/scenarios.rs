//! Conformance scenarios every feed engine must satisfy.

use feedpipe::engine::{FeedEngine, SampleQueue};
use feedpipe::placement::Device;
use feedpipe::source::{CounterSource, RandomSource, Source};
use feedpipe::tensor::{DType, Shape, Tensor};

pub fn constant_queue_repeats_its_value<E: FeedEngine>(engine: &E) {
    let value = Tensor::full_u8(Shape::new(vec![2, 3]), 42);
    let mut queue = engine
        .value_queue(value.clone(), Device::Cpu)
        .expect("constant queue should build");
    for _ in 0..4 {
        let sample = queue
            .pull()
            .expect("constant queue never fails")
            .expect("constant queue never ends");
        assert_eq!(sample, value);
    }
}

pub fn source_queue_preserves_sample_order<E: FeedEngine>(engine: &E) {
    let start = Tensor::from_i32(Shape::new(vec![1]), vec![5]).expect("valid start value");
    let source = Source::from(CounterSource::new(start));
    let mut queue = engine
        .source_queue(source, Device::Cpu, 2)
        .expect("source queue should build");
    for expected in 5..10 {
        let sample = queue
            .pull()
            .expect("counter queue never fails")
            .expect("counter queue never ends");
        assert_eq!(sample.data_i32(), &[expected]);
    }
}

pub fn source_queue_signals_end_of_sequence<E: FeedEngine>(engine: &E) {
    let source = RandomSource::new(vec![4, 4], DType::U8, 7)
        .expect("valid bounds")
        .with_stop(2);
    let mut queue = engine
        .source_queue(Source::from(source), Device::Cpu, 1)
        .expect("source queue should build");
    for _ in 0..3 {
        assert!(queue
            .pull()
            .expect("bounded queue never fails")
            .is_some());
    }
    assert!(queue.pull().expect("exhaustion is not an error").is_none());
    // Exhaustion is sticky.
    assert!(queue.pull().expect("exhaustion is not an error").is_none());
}

pub fn transfer_copies_contents_exactly<E: FeedEngine>(engine: &E) {
    let samples = vec![
        Tensor::from_u8(Shape::new(vec![3]), vec![1, 2, 3]).expect("valid sample"),
        Tensor::from_u8(Shape::new(vec![2]), vec![9, 8]).expect("valid sample"),
    ];
    let moved = engine
        .transfer(samples.clone(), Device::Cpu, Device::Gpu)
        .expect("transfer should succeed");
    assert_eq!(moved, samples);
}

pub fn dropping_a_backpressured_queue_does_not_hang<E: FeedEngine>(engine: &E) {
    let start = Tensor::from_i32(Shape::new(vec![1]), vec![0]).expect("valid start value");
    let source = Source::from(CounterSource::new(start));
    let mut queue = engine
        .source_queue(source, Device::Cpu, 1)
        .expect("source queue should build");
    // The producer is infinite and the channel tiny; a single pull then a
    // drop must still tear the producer down.
    let _ = queue.pull().expect("counter queue never fails");
    drop(queue);
}
