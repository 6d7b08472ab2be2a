use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::activation::activation::HiddenGradientMask;
use crate::train::epoch_stats::EpochStats;

/// When the output-layer update happens relative to reading `w2` for the
/// hidden gradient.
///
/// - `PreUpdate`: `d_hidden[j]` accumulates `d_out[k] * w2[j][k]` using the
///                weight as it was before this step touched it (textbook backprop).
/// - `InPlace`:   each weight is decremented first and the already-updated value
///                feeds `d_hidden`. Matches the older single-pass update;
///                trained weights differ slightly from `PreUpdate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackpropOrder {
    #[default]
    PreUpdate,
    InPlace,
}

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`:        full passes over the dataset, in dataset order
/// - `learning_rate`: SGD step size, must be finite and > 0
/// - `backprop`:      see [`BackpropOrder`]
/// - `hidden_mask`:   see [`HiddenGradientMask`]
/// - `check_finite`:  when set, a NaN/Inf per-sample loss aborts training
///                     with `Error::NonFiniteLoss`; when clear nothing is checked
/// - `progress_tx`:   optional channel sender; one `EpochStats` per completed
///                     epoch. If the receiver is dropped the loop stops.
/// - `stop_flag`:     optional atomic flag; when set from another thread the
///                     loop stops at the next epoch boundary.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f32,
    pub backprop: BackpropOrder,
    pub hidden_mask: HiddenGradientMask,
    pub check_finite: bool,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with default backprop behaviour, no progress
    /// channel and no stop flag.
    pub fn new(epochs: usize, learning_rate: f32) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            backprop: BackpropOrder::default(),
            hidden_mask: HiddenGradientMask::default(),
            check_finite: false,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
