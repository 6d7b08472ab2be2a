use serde::{Deserialize, Serialize};

/// Slope of the hidden activation on its non-positive branch.
pub const LEAKY_SLOPE: f32 = 0.01;

/// Hidden-layer activation: `x` when positive, `0.01 * x` otherwise.
#[inline]
pub fn leaky_relu(x: f32) -> f32 {
    if x > 0.0 { x } else { LEAKY_SLOPE * x }
}

/// Converts raw output scores into a probability distribution.
///
/// The maximum logit is subtracted before exponentiating so large scores
/// cannot overflow `exp`.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&z| (z - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// How the backward pass treats hidden units whose pre-activation is `<= 0`.
///
/// - `Zero`:  the gradient is dropped entirely, even though the forward pass
///            lets `0.01 * x` through. Existing trained models were produced
///            this way.
/// - `Leaky`: the gradient is scaled by [`LEAKY_SLOPE`], matching the forward
///            slope exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenGradientMask {
    #[default]
    Zero,
    Leaky,
}

impl HiddenGradientMask {
    /// Applies the mask to one hidden gradient given that unit's pre-activation.
    #[inline]
    pub fn apply(self, pre_activation: f32, grad: f32) -> f32 {
        if pre_activation > 0.0 {
            return grad;
        }
        match self {
            HiddenGradientMask::Zero => 0.0,
            HiddenGradientMask::Leaky => grad * LEAKY_SLOPE,
        }
    }
}
