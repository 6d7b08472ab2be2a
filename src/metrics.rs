use crate::data::sample::Sample;
use crate::error::{ensure_len, Error, Result};
use crate::network::model::Model;

/// Classification tally over a set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    /// Fraction of correct predictions in [0, 1].
    pub fn accuracy(&self) -> f32 {
        self.correct as f32 / self.total as f32
    }
}

/// Counts how often the predicted class matches the sample's hot class.
///
/// Every sample must match the model's input and output sizes and carry a
/// one-hot target; the first that does not aborts the evaluation.
pub fn evaluate(model: &Model, samples: &[Sample]) -> Result<Evaluation> {
    if samples.is_empty() {
        return Err(Error::EmptyDataset);
    }
    let mut correct = 0;
    for sample in samples {
        ensure_len("sample target", model.output_size(), sample.target.len())?;
        sample.check_one_hot()?;
        if model.predict(&sample.input)?.predicted_index == sample.class_index() {
            correct += 1;
        }
    }
    Ok(Evaluation { correct, total: samples.len() })
}
