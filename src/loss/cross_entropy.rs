/// Categorical cross-entropy for a softmax output layer.
pub struct CrossEntropyLoss;

/// Added inside ln() so a zero probability yields a large but finite loss.
pub const EPS: f32 = 1e-7;

impl CrossEntropyLoss {
    /// L = -sum(expected[k] * ln(predicted[k] + eps))
    pub fn loss(predicted: &[f32], expected: &[f32]) -> f32 {
        predicted.iter().zip(expected.iter())
            .map(|(p, t)| -t * (p + EPS).ln())
            .sum()
    }

    /// Gradient of softmax + cross-entropy w.r.t. the logits: `predicted - expected`.
    pub fn derivative(predicted: &[f32], expected: &[f32]) -> Vec<f32> {
        predicted.iter().zip(expected.iter())
            .map(|(p, t)| p - t)
            .collect()
    }
}
