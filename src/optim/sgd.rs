use crate::error::{Error, Result};

/// Plain per-example stochastic gradient descent.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f32,
}

impl Sgd {
    pub fn new(learning_rate: f32) -> Result<Sgd> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be finite and > 0, got {learning_rate}"
            )));
        }
        Ok(Sgd { learning_rate })
    }

    /// One descent step on a single parameter: `param -= lr * grad`.
    #[inline]
    pub fn apply(&self, param: &mut f32, grad: f32) {
        *param -= self.learning_rate * grad;
    }
}
