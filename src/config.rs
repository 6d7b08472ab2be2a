use serde::Deserialize;
use std::path::Path;

use crate::activation::activation::HiddenGradientMask;
use crate::data::labels::LabelScheme;
use crate::error::{Error, Result};
use crate::train::train_config::{BackpropOrder, TrainConfig};

/// Run settings read from a YAML file and/or the command line.
/// Every field may be omitted; `resolve` fills in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Side of the square pixel grid; the input size is its square.
    pub grid_side: Option<usize>,
    pub hidden_size: Option<usize>,
    pub epochs: Option<usize>,
    pub learning_rate: Option<f32>,
    /// Number of trailing dataset samples kept out of training for evaluation.
    pub holdout: Option<usize>,
    /// Seed for weight initialisation; random when absent.
    pub seed: Option<u64>,
    pub labels: Option<LabelScheme>,
    pub backprop: Option<BackpropOrder>,
    pub hidden_mask: Option<HiddenGradientMask>,
    pub check_finite: Option<bool>,
}

/// `RunConfig` with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub grid_side: usize,
    pub hidden_size: usize,
    pub epochs: usize,
    pub learning_rate: f32,
    pub holdout: usize,
    pub seed: Option<u64>,
    pub labels: LabelScheme,
    pub backprop: BackpropOrder,
    pub hidden_mask: HiddenGradientMask,
    pub check_finite: bool,
}

impl RunConfig {
    /// Reads a YAML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&text).map_err(|e| Error::Format(format!("config: {e}")))
    }

    // merge configs where the second overwrites the first
    pub fn merge(self, other: Self) -> Self {
        Self {
            grid_side: other.grid_side.or(self.grid_side),
            hidden_size: other.hidden_size.or(self.hidden_size),
            epochs: other.epochs.or(self.epochs),
            learning_rate: other.learning_rate.or(self.learning_rate),
            holdout: other.holdout.or(self.holdout),
            seed: other.seed.or(self.seed),
            labels: other.labels.or(self.labels),
            backprop: other.backprop.or(self.backprop),
            hidden_mask: other.hidden_mask.or(self.hidden_mask),
            check_finite: other.check_finite.or(self.check_finite),
        }
    }

    pub fn resolve(self) -> Settings {
        Settings {
            grid_side: self.grid_side.unwrap_or(28),
            hidden_size: self.hidden_size.unwrap_or(64),
            epochs: self.epochs.unwrap_or(20),
            learning_rate: self.learning_rate.unwrap_or(0.01),
            holdout: self.holdout.unwrap_or(0),
            seed: self.seed,
            labels: self.labels.unwrap_or_default(),
            backprop: self.backprop.unwrap_or_default(),
            hidden_mask: self.hidden_mask.unwrap_or_default(),
            check_finite: self.check_finite.unwrap_or(false),
        }
    }
}

impl Settings {
    pub fn input_size(&self) -> usize {
        self.grid_side * self.grid_side
    }

    pub fn train_config(&self) -> TrainConfig {
        let mut config = TrainConfig::new(self.epochs, self.learning_rate);
        config.backprop = self.backprop;
        config.hidden_mask = self.hidden_mask;
        config.check_finite = self.check_finite;
        config
    }
}
