use std::path::PathBuf;

use glyph_mlp::{train, Error, Matrix, Model, Sample};
use proptest::prelude::*;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("glyph-mlp-{}-{name}", std::process::id()))
}

fn bits(model: &Model) -> Vec<u32> {
    model.w1().iter_values()
        .chain(model.b1().iter().copied())
        .chain(model.w2().iter_values())
        .chain(model.b2().iter().copied())
        .map(f32::to_bits)
        .collect()
}

fn roundtrip(model: &Model) -> Model {
    let mut bytes = Vec::new();
    model.write_to(&mut bytes).unwrap();
    Model::read_from(&mut bytes.as_slice()).unwrap()
}

#[test]
fn trained_model_survives_a_file_roundtrip() {
    let mut model = Model::with_seed(9, 5, 3, 21).unwrap();
    let data = vec![
        Sample::one_hot(vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0], 0, 3).unwrap(),
        Sample::one_hot(vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0], 2, 3).unwrap(),
    ];
    train(&mut model, &data, 10, 0.05).unwrap();

    let path = temp_path("trained.bin");
    model.save(&path).unwrap();
    let loaded = Model::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(bits(&loaded), bits(&model));
    assert_eq!(loaded, model);
    for sample in &data {
        assert_eq!(loaded.predict(&sample.input).unwrap(), model.predict(&sample.input).unwrap());
    }
}

#[test]
fn edge_sizes_roundtrip() {
    for (i, h, o) in [(1, 1, 1), (3, 1, 2), (2, 4, 1)] {
        let model = Model::with_seed(i, h, o, 8).unwrap();
        assert_eq!(bits(&roundtrip(&model)), bits(&model), "{i}x{h}x{o}");
    }
}

#[test]
fn special_float_values_keep_their_bits() {
    let w1 = Matrix::from_data(vec![vec![-0.0, f32::MIN_POSITIVE / 2.0]]).unwrap();
    let w2 = Matrix::from_data(vec![vec![f32::MAX], vec![f32::MIN]]).unwrap();
    let model = Model::from_parts(w1, vec![1e-30, -1e30], w2, vec![f32::EPSILON]).unwrap();
    assert_eq!(bits(&roundtrip(&model)), bits(&model));
}

#[test]
fn failed_load_leaves_existing_model_untouched() {
    let path = temp_path("corrupt.bin");
    let mut bytes = Vec::new();
    Model::with_seed(4, 3, 2, 1).unwrap().write_to(&mut bytes).unwrap();
    bytes.truncate(bytes.len() / 2);
    std::fs::write(&path, &bytes).unwrap();

    let mut current = Model::with_seed(4, 3, 2, 99).unwrap();
    let snapshot = current.clone();
    match Model::load(&path) {
        Ok(model) => current = model,
        Err(err) => assert!(matches!(err, Error::Format(_))),
    }
    std::fs::remove_file(&path).unwrap();
    assert_eq!(current, snapshot);
}

#[test]
fn json_export_reloads() {
    let model = Model::with_seed(4, 2, 3, 4).unwrap();
    let path = temp_path("model.json");
    model.save_json(&path).unwrap();
    let loaded = Model::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!((loaded.input_size(), loaded.hidden_size(), loaded.output_size()), (4, 2, 3));
    assert_eq!(
        loaded.predict(&[1.0, 0.0, 1.0, 1.0]).unwrap().predicted_index,
        model.predict(&[1.0, 0.0, 1.0, 1.0]).unwrap().predicted_index
    );
}

fn arb_model() -> impl Strategy<Value = Model> {
    (1usize..6, 1usize..6, 1usize..6).prop_flat_map(|(i, h, o)| {
        (
            prop::collection::vec(any::<f32>(), i * h),
            prop::collection::vec(any::<f32>(), h),
            prop::collection::vec(any::<f32>(), h * o),
            prop::collection::vec(any::<f32>(), o),
        )
            .prop_map(move |(w1, b1, w2, b2)| {
                Model::from_parts(
                    Matrix::from_flat(i, h, &w1).unwrap(),
                    b1,
                    Matrix::from_flat(h, o, &w2).unwrap(),
                    b2,
                )
                .unwrap()
            })
    })
}

proptest! {
    #[test]
    fn binary_roundtrip_is_bit_exact(model in arb_model()) {
        prop_assert_eq!(bits(&roundtrip(&model)), bits(&model));
    }

    #[test]
    fn any_truncation_is_rejected(model in arb_model(), cut in 1usize..64) {
        let mut bytes = Vec::new();
        model.write_to(&mut bytes).unwrap();
        let keep = bytes.len().saturating_sub(cut);
        let result = Model::read_from(&mut &bytes[..keep]);
        prop_assert!(matches!(result, Err(Error::Format(_))));
    }
}
