use crate::activation::activation::{leaky_relu, softmax};
use crate::error::{ensure_len, Result};
use crate::network::model::Model;

/// Intermediate values of one forward pass, kept for the backward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    /// Hidden pre-activations `b1 + input · w1`.
    pub hidden_raw: Vec<f32>,
    /// `leaky_relu(hidden_raw)`.
    pub hidden: Vec<f32>,
    /// Softmax over the output logits; sums to 1.
    pub probs: Vec<f32>,
}

impl Model {
    /// Computes hidden activations and output probabilities for one input.
    ///
    /// Fails with `DimensionMismatch` when `input.len() != input_size`.
    pub fn forward(&self, input: &[f32]) -> Result<ForwardPass> {
        ensure_len("input", self.input_size(), input.len())?;

        let mut hidden_raw = self.b1.clone();
        for (x, w_row) in input.iter().zip(&self.w1.data) {
            for (sum, w) in hidden_raw.iter_mut().zip(w_row) {
                *sum += x * w;
            }
        }
        let hidden: Vec<f32> = hidden_raw.iter().map(|&z| leaky_relu(z)).collect();

        let mut logits = self.b2.clone();
        for (h, w_row) in hidden.iter().zip(&self.w2.data) {
            for (sum, w) in logits.iter_mut().zip(w_row) {
                *sum += h * w;
            }
        }

        Ok(ForwardPass { hidden_raw, hidden, probs: softmax(&logits) })
    }
}
