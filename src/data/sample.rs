use crate::error::{Error, Result};

/// One labelled training example.
///
/// `input` entries are 0.0/1.0 pixels for grid data, though any float is
/// accepted. `target` is one-hot over the output classes.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Vec<f32>,
    pub target: Vec<f32>,
}

/// Ordered training data, visited front to back every epoch.
pub type Dataset = Vec<Sample>;

impl Sample {
    /// Builds a sample from an explicit target, which must be one-hot.
    pub fn new(input: Vec<f32>, target: Vec<f32>) -> Result<Sample> {
        let sample = Sample { input, target };
        sample.check_one_hot()?;
        Ok(sample)
    }

    /// Builds a sample whose target has a single `1.0` at `class`.
    pub fn one_hot(input: Vec<f32>, class: usize, classes: usize) -> Result<Sample> {
        if class >= classes {
            return Err(Error::InvalidConfig(format!(
                "class index {class} out of range for {classes} classes"
            )));
        }
        let mut target = vec![0.0; classes];
        target[class] = 1.0;
        Ok(Sample { input, target })
    }

    /// Index of the hot entry.
    pub fn class_index(&self) -> usize {
        crate::network::prediction::argmax(&self.target)
    }

    /// Fails unless exactly one target entry is `1.0` and every other is `0.0`.
    pub fn check_one_hot(&self) -> Result<()> {
        let hot = self.target.iter().filter(|&&t| t == 1.0).count();
        let cold = self.target.iter().filter(|&&t| t == 0.0).count();
        if hot != 1 || hot + cold != self.target.len() {
            return Err(Error::InvalidConfig(format!(
                "target {:?} is not one-hot",
                self.target
            )));
        }
        Ok(())
    }
}

/// Splits off the last `count` samples as a held-out test slice.
///
/// Returns `(train, test)`. When `count` covers the whole set, `train` is empty.
pub fn split_holdout(mut samples: Dataset, count: usize) -> (Dataset, Dataset) {
    let at = samples.len().saturating_sub(count);
    let test = samples.split_off(at);
    (samples, test)
}
