use glyph_mlp::data::{parse_dataset, SymbolSet};
use glyph_mlp::{
    evaluate, train, train_loop, BackpropOrder, Error, HiddenGradientMask, Matrix, Model, Sample,
    TrainConfig,
};
use proptest::prelude::*;

/// 4-3-2 model with fixed weights inside the usual U(-0.1, 0.1) init range.
///
/// Random init is not used here: with a seeded U(-0.1, 0.1) start, 50 epochs
/// at lr 0.1 leave most seeds short of 0.9 confidence on the two-sample set
/// (roughly 9 in 10 fail, some stuck near 0.5). These weights converge for
/// every backward variant.
fn scenario_model() -> Model {
    let w1 = Matrix::from_data(vec![
        vec![0.1, -0.1, 0.05],
        vec![0.02, 0.03, -0.04],
        vec![-0.03, 0.01, 0.02],
        vec![-0.1, 0.1, 0.05],
    ])
    .unwrap();
    let w2 = Matrix::from_data(vec![
        vec![0.1, -0.1],
        vec![-0.1, 0.1],
        vec![0.05, 0.05],
    ])
    .unwrap();
    Model::from_parts(w1, vec![0.0; 3], w2, vec![0.0; 2]).unwrap()
}

fn scenario_data() -> Vec<Sample> {
    vec![
        Sample::new(vec![1.0, 0.0, 0.0, 0.0], vec![1.0, 0.0]).unwrap(),
        Sample::new(vec![0.0, 0.0, 0.0, 1.0], vec![0.0, 1.0]).unwrap(),
    ]
}

/// Two samples, 50 epochs, lr 0.1: both classes predicted with > 0.9
/// confidence. Starts from [`scenario_model`] rather than a random init.
#[test]
fn two_sample_scenario_separates_classes() {
    let mut model = scenario_model();
    train(&mut model, &scenario_data(), 50, 0.1).unwrap();

    let first = model.predict(&[1.0, 0.0, 0.0, 0.0]).unwrap();
    assert_eq!(first.predicted_index, 0);
    assert!(first.confidence > 0.9, "confidence {}", first.confidence);

    let second = model.predict(&[0.0, 0.0, 0.0, 1.0]).unwrap();
    assert_eq!(second.predicted_index, 1);
    assert!(second.confidence > 0.9, "confidence {}", second.confidence);
}

#[test]
fn scenario_holds_for_every_backward_variant() {
    for backprop in [BackpropOrder::PreUpdate, BackpropOrder::InPlace] {
        for hidden_mask in [HiddenGradientMask::Zero, HiddenGradientMask::Leaky] {
            let mut config = TrainConfig::new(50, 0.1);
            config.backprop = backprop;
            config.hidden_mask = hidden_mask;
            let mut model = scenario_model();
            let outcome = train_loop(&mut model, &scenario_data(), &config).unwrap();
            assert_eq!(outcome.epochs_completed, 50);
            assert!(outcome.last_loss.unwrap() < 0.1, "{backprop:?}/{hidden_mask:?}");
            let eval = evaluate(&model, &scenario_data()).unwrap();
            assert_eq!(eval.correct, 2, "{backprop:?}/{hidden_mask:?}");
        }
    }
}

#[test]
fn single_sample_loss_falls_and_confidence_rises() {
    let sample = Sample::one_hot(vec![1.0, 0.0, 1.0, 0.0, 1.0, 1.0], 2, 3).unwrap();
    for seed in 0..10 {
        let mut model = Model::with_seed(6, 4, 3, seed).unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        let mut config = TrainConfig::new(100, 0.1);
        config.progress_tx = Some(tx);
        train_loop(&mut model, std::slice::from_ref(&sample), &config).unwrap();
        drop(config);

        let losses: Vec<f32> = rx.iter().map(|s| s.mean_loss).collect();
        assert_eq!(losses.len(), 100);
        assert!(losses[99] < losses[0], "seed {seed}: {} !< {}", losses[99], losses[0]);

        let res = model.predict(&sample.input).unwrap();
        assert_eq!(res.predicted_index, 2, "seed {seed}");
        assert!(res.confidence > 0.9, "seed {seed}: confidence {}", res.confidence);
    }
}

#[test]
fn empty_dataset_is_not_silent_success() {
    let mut model = scenario_model();
    assert!(matches!(train(&mut model, &[], 10, 0.1), Err(Error::EmptyDataset)));
}

#[test]
fn soft_targets_are_refused() {
    assert!(Sample::new(vec![1.0], vec![0.5, 0.5]).is_err());

    let mut model = Model::with_seed(1, 2, 2, 0).unwrap();
    let soft = Sample { input: vec![1.0], target: vec![0.5, 0.5] };
    assert!(matches!(train(&mut model, &[soft], 1, 0.1), Err(Error::InvalidConfig(_))));
}

#[test]
fn wrong_input_length_is_fatal_to_predict() {
    let model = scenario_model();
    assert!(matches!(
        model.predict(&[1.0, 0.0]),
        Err(Error::DimensionMismatch { expected: 4, actual: 2, .. })
    ));
}

#[test]
fn csv_pipeline_drops_bad_lines_and_trains_on_the_rest() {
    let text = "\
a,1,0,0,0
4,0,0,0,1
a,1,0,0
z,1,1,1,1
f,0,1,1,0
a,1,0,0,0
4,0,0,0,1
f,0,1,1,0
";
    let labels = SymbolSet::new(["a", "4", "f"]);
    let parsed = parse_dataset(text, 2, &labels);
    assert_eq!(parsed.skipped, 2);
    assert_eq!(parsed.samples.len(), 6);

    let mut model = Model::with_seed(4, 8, 3, 3).unwrap();
    train(&mut model, &parsed.samples, 200, 0.1).unwrap();
    let eval = evaluate(&model, &parsed.samples).unwrap();
    assert_eq!(eval.total, 6);
    assert_eq!(eval.correct, 6);
}

proptest! {
    #[test]
    fn untrained_predictions_are_in_bounds(
        input_size in 1usize..24,
        hidden_size in 1usize..12,
        output_size in 1usize..8,
        seed in any::<u64>(),
        pixels in prop::collection::vec(prop::bool::ANY, 24),
    ) {
        let model = Model::with_seed(input_size, hidden_size, output_size, seed).unwrap();
        let input: Vec<f32> = pixels[..input_size].iter().map(|&b| f32::from(u8::from(b))).collect();

        let pass = model.forward(&input).unwrap();
        let sum: f32 = pass.probs.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-5);

        let res = model.predict(&input).unwrap();
        prop_assert!(res.predicted_index < output_size);
        prop_assert!((0.0..=1.0).contains(&res.confidence));
        prop_assert_eq!(res.confidence, pass.probs[res.predicted_index]);
    }
}
