use crate::error::Result;
use crate::network::model::Model;

/// The decision for one input: best class and its softmax probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub predicted_index: usize,
    pub confidence: f32,
}

impl Model {
    /// Classifies `input`. Ties go to the lowest index.
    pub fn predict(&self, input: &[f32]) -> Result<PredictionResult> {
        let probs = self.forward(input)?.probs;
        let predicted_index = argmax(&probs);
        Ok(PredictionResult {
            predicted_index,
            confidence: probs[predicted_index],
        })
    }
}

/// Index of the first maximum. Later entries must be strictly greater to win.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
