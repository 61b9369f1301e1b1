use std::sync::Arc;

use feedpipe::engine::FeedEngine;
use feedpipe::feed::descriptor::{Dim, SourceDescriptor, SourceKind};
use feedpipe::pipeline::{build_feed, BindingState, PipelineBinding, PipelineOptions};
use feedpipe::source::{CounterSource, FixedSource, RandomSource, Source};
use feedpipe::tensor::{DType, Shape, Tensor};
use feedpipe::{Device, FeedError, InputSlot};
use feedpipe_engine_host::HostEngine;

fn cpu_options(batch_size: usize) -> PipelineOptions {
    PipelineOptions {
        batch_size,
        ..PipelineOptions::default()
    }
}

#[test]
fn fixed_value_feed_batches_and_derives() {
    // A (3,4) constant of 7s supplied through the engine's repeating queue.
    let engine = Arc::new(HostEngine::new());
    let value = Tensor::full_u8(Shape::new(vec![3, 4]), 7);
    let queue = engine
        .value_queue(value, Device::Cpu)
        .expect("constant queue should build");
    let descriptor = SourceDescriptor::new(
        DType::U8,
        SourceKind::External,
        vec![Dim::Static(3), Dim::Static(4)],
    );
    let slot = InputSlot::deferred("input_placeholder", Device::Cpu, descriptor, queue);

    let (mut binding, shapes, dtypes) =
        build_feed(engine, vec![slot], cpu_options(2)).expect("binding should succeed");
    assert_eq!(
        shapes,
        vec![
            vec![Dim::Static(2), Dim::Dynamic, Dim::Dynamic],
            vec![Dim::Static(2), Dim::Dynamic, Dim::Dynamic],
        ]
    );
    assert_eq!(dtypes, vec![DType::U8, DType::I32]);

    for _ in 0..3 {
        let outputs = binding
            .pull()
            .expect("pull should succeed")
            .expect("constant feed never ends");
        assert_eq!(outputs.len(), 2);

        let raw = &outputs[0];
        assert_eq!(raw.data().shape().dims(), &[2, 3, 4]);
        assert!(raw.data().data_u8().iter().all(|&v| v == 7));

        let derived = &outputs[1];
        assert_eq!(derived.data().shape().dims(), &[2, 3, 4]);
        assert!(derived.data().data_i32().iter().all(|&v| v == 17));
    }
}

#[test]
fn multi_input_counters_advance_in_lockstep() {
    let engine = Arc::new(HostEngine::new());
    let starts = [0, 100];
    let slots: Vec<_> = starts
        .iter()
        .enumerate()
        .map(|(index, &start)| {
            let value = Tensor::from_i32(Shape::new(vec![1]), vec![start]).unwrap();
            InputSlot::eager(
                format!("input_{index}"),
                Device::Cpu,
                Source::from(CounterSource::new(value)),
            )
        })
        .collect();

    let (mut binding, shapes, dtypes) =
        build_feed(engine, slots, cpu_options(1)).expect("binding should succeed");
    assert_eq!(shapes.len(), 4);
    assert_eq!(dtypes, vec![DType::I32, DType::I32, DType::I32, DType::I32]);

    let mut last = None;
    for _ in 0..3 {
        last = binding.pull().expect("pull should succeed");
    }
    let outputs = last.expect("counter feed never ends");
    // Fixed order: raw inputs first, then their derived counterparts.
    assert_eq!(outputs[0].data().data_i32(), &[2]);
    assert_eq!(outputs[1].data().data_i32(), &[102]);
    assert_eq!(outputs[2].data().data_i32(), &[12]);
    assert_eq!(outputs[3].data().data_i32(), &[112]);
}

#[test]
fn inputs_pad_independently_of_each_other() {
    let engine = Arc::new(HostEngine::new());
    let wide = Tensor::full_u8(Shape::new(vec![1, 9]), 1);
    let tall = Tensor::full_u8(Shape::new(vec![5, 2]), 2);
    let slots = vec![
        InputSlot::eager("wide", Device::Cpu, Source::from(FixedSource::new(wide))),
        InputSlot::eager("tall", Device::Cpu, Source::from(FixedSource::new(tall))),
    ];

    let (mut binding, _, _) =
        build_feed(engine, slots, cpu_options(2)).expect("binding should succeed");
    let outputs = binding.pull().expect("pull should succeed").unwrap();
    assert_eq!(outputs[0].data().shape().dims(), &[2, 1, 9]);
    assert_eq!(outputs[1].data().shape().dims(), &[2, 5, 2]);
}

#[test]
fn bounded_feed_exhausts_without_partial_batches() {
    let engine = Arc::new(HostEngine::new());
    // Three samples available, batch size two: one full batch, then
    // end-of-sequence with the leftover sample discarded.
    let source = RandomSource::new(vec![4], DType::U8, 5)
        .expect("valid bounds")
        .with_stop(2);
    let slot = InputSlot::eager("input", Device::Cpu, Source::from(source));

    let (mut binding, _, _) =
        build_feed(engine, vec![slot], cpu_options(2)).expect("binding should succeed");
    assert!(binding.pull().expect("first pull succeeds").is_some());
    assert!(binding.pull().expect("exhaustion is not an error").is_none());
    assert_eq!(binding.state(), BindingState::Exhausted);
    assert!(binding.pull().expect("exhaustion is sticky").is_none());
}

#[test]
fn pulling_a_closed_binding_is_a_state_error() {
    let engine = Arc::new(HostEngine::new());
    let value = Tensor::full_u8(Shape::new(vec![2]), 1);
    let slot = InputSlot::eager("input", Device::Cpu, Source::from(FixedSource::new(value)));

    let (mut binding, _, _) =
        build_feed(engine, vec![slot], cpu_options(1)).expect("binding should succeed");
    assert!(binding.pull().expect("pull should succeed").is_some());

    binding.close();
    assert_eq!(binding.state(), BindingState::Closed);
    match binding.pull() {
        Err(FeedError::BindingState { op, state }) => {
            assert_eq!(op, "pull");
            assert_eq!(state, BindingState::Closed);
        }
        other => panic!("expected a binding state error, got {other:?}"),
    }
    // Closing again stays a no-op.
    binding.close();
}

#[test]
fn bind_rejects_static_misconfiguration() {
    let engine = Arc::new(HostEngine::new());
    let slot = || {
        InputSlot::eager(
            "input",
            Device::Cpu,
            Source::from(FixedSource::new(Tensor::full_u8(Shape::new(vec![2]), 1))),
        )
    };

    let zero_batch = PipelineBinding::bind(Arc::clone(&engine), vec![slot()], cpu_options(0));
    assert!(matches!(zero_batch, Err(FeedError::Config(_))));

    let bad_shard = PipelineBinding::bind(
        Arc::clone(&engine),
        vec![slot()],
        PipelineOptions {
            shard_id: 3,
            num_shards: 2,
            ..PipelineOptions::default()
        },
    );
    assert!(matches!(bad_shard, Err(FeedError::Config(_))));

    let duplicates = PipelineBinding::bind(Arc::clone(&engine), vec![slot(), slot()], cpu_options(1));
    assert!(matches!(duplicates, Err(FeedError::Config(_))));

    let empty = PipelineBinding::bind(engine, Vec::new(), cpu_options(1));
    assert!(matches!(empty, Err(FeedError::Config(_))));
}

#[test]
fn dtype_mismatch_is_caught_at_the_first_batch() {
    let engine = Arc::new(HostEngine::new());
    // Declared u8, actually fed i32.
    let queue = engine
        .value_queue(
            Tensor::from_i32(Shape::new(vec![2]), vec![1, 2]).unwrap(),
            Device::Cpu,
        )
        .expect("constant queue should build");
    let descriptor = SourceDescriptor::new(DType::U8, SourceKind::External, vec![Dim::Dynamic]);
    let slot = InputSlot::deferred("input", Device::Cpu, descriptor, queue);

    let (mut binding, _, _) =
        build_feed(engine, vec![slot], cpu_options(1)).expect("binding should succeed");
    match binding.pull() {
        Err(FeedError::ShapeContract { input, .. }) => assert_eq!(input, "input"),
        other => panic!("expected a contract violation, got {other:?}"),
    }
    // Contract violations abort the binding.
    assert!(matches!(
        binding.pull(),
        Err(FeedError::BindingState { .. })
    ));
}

#[test]
fn oversized_sample_is_a_contract_violation() {
    let engine = Arc::new(HostEngine::new());
    let queue = engine
        .value_queue(Tensor::full_u8(Shape::new(vec![3, 3]), 1), Device::Cpu)
        .expect("constant queue should build");
    let descriptor = SourceDescriptor::new(
        DType::U8,
        SourceKind::External,
        vec![Dim::Static(2), Dim::Static(2)],
    );
    let slot = InputSlot::deferred("input", Device::Cpu, descriptor, queue);

    let (mut binding, _, _) =
        build_feed(engine, vec![slot], cpu_options(1)).expect("binding should succeed");
    assert!(matches!(
        binding.pull(),
        Err(FeedError::ShapeContract { .. })
    ));
}

#[test]
fn closing_a_running_feed_with_a_live_producer_returns_promptly() {
    let engine = Arc::new(HostEngine::new());
    // Infinite producer behind a tiny queue; close must drain it without
    // waiting on the producer.
    let counter = CounterSource::new(Tensor::from_i32(Shape::new(vec![1]), vec![0]).unwrap());
    let queue = engine
        .source_queue(Source::from(counter), Device::Cpu, 1)
        .expect("source queue should build");
    let probe = Tensor::zeros(Shape::new(vec![1]), DType::I32);
    let slot = InputSlot::deferred("input", Device::Cpu, SourceDescriptor::from_probe(&probe), queue);

    let (mut binding, _, _) =
        build_feed(engine, vec![slot], cpu_options(1)).expect("binding should succeed");
    assert!(binding.pull().expect("pull should succeed").is_some());
    binding.close();
    assert_eq!(binding.state(), BindingState::Closed);
}

#[test]
fn bind_restarts_eager_sources() {
    let engine = Arc::new(HostEngine::new());
    let mut counter = CounterSource::new(Tensor::from_i32(Shape::new(vec![1]), vec![0]).unwrap());
    // Advance the source before binding; bind must reset it.
    counter.next_sample().expect("counter never fails");
    counter.next_sample().expect("counter never fails");

    let slot = InputSlot::eager("input", Device::Cpu, Source::from(counter));
    let (mut binding, _, _) =
        build_feed(engine, vec![slot], cpu_options(1)).expect("binding should succeed");
    let outputs = binding.pull().expect("pull should succeed").unwrap();
    assert_eq!(outputs[0].data().data_i32(), &[0]);
}
