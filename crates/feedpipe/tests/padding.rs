use feedpipe::pipeline::{derive, Batch};
use feedpipe::source::RandomSource;
use feedpipe::tensor::{DType, Shape, Tensor};

fn random_samples(count: usize, seed: u64) -> Vec<Tensor> {
    let mut source = RandomSource::new(vec![6, 9], DType::U8, seed).expect("valid bounds");
    (0..count)
        .map(|_| source.next_sample().expect("pull never fails").unwrap())
        .collect()
}

#[test]
fn padded_raw_batch_unpads_to_the_original_samples() {
    let samples = random_samples(5, 11);
    let batch = Batch::pad("input", samples.clone()).expect("padding succeeds");

    assert_eq!(batch.batch_size(), 5);
    let padded_dims = batch.data().shape().dims();
    assert_eq!(padded_dims[0], 5);
    for (index, sample) in samples.iter().enumerate() {
        assert_eq!(&batch.unpad(index).expect("index in range"), sample);
    }
}

#[test]
fn padded_derived_batch_unpads_to_offset_cast_values() {
    let samples = random_samples(3, 23);
    let derived: Vec<Tensor> = samples.iter().map(derive).collect();
    let batch = Batch::pad("input", derived).expect("padding succeeds");

    assert_eq!(batch.data().dtype(), DType::I32);
    for (index, sample) in samples.iter().enumerate() {
        let recovered = batch.unpad(index).expect("index in range");
        assert_eq!(recovered.shape(), sample.shape());
        let expected: Vec<i32> = sample.data_u8().iter().map(|&v| i32::from(v) + 10).collect();
        assert_eq!(recovered.data_i32(), expected.as_slice());
    }
}

#[test]
fn padded_margin_is_zero_filled() {
    let a = Tensor::from_u8(Shape::new(vec![1, 1]), vec![5]).unwrap();
    let b = Tensor::from_u8(Shape::new(vec![2, 3]), vec![1, 2, 3, 4, 5, 6]).unwrap();
    let batch = Batch::pad("input", vec![a, b]).expect("padding succeeds");

    assert_eq!(batch.data().shape().dims(), &[2, 2, 3]);
    assert_eq!(
        batch.data().data_u8(),
        &[5, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6]
    );
}

#[test]
fn batch_padding_tracks_the_maximum_per_axis() {
    // Maxima come from different samples along different axes.
    let a = Tensor::zeros(Shape::new(vec![4, 1]), DType::U8);
    let b = Tensor::zeros(Shape::new(vec![1, 7]), DType::U8);
    let batch = Batch::pad("input", vec![a, b]).expect("padding succeeds");
    assert_eq!(batch.data().shape().dims(), &[2, 4, 7]);
}
