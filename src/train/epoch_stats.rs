use serde::{Deserialize, Serialize};

/// Per-epoch progress emitted by `train_loop`.
///
/// Sent over `TrainConfig::progress_tx` at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Mean cross-entropy over all samples in this epoch.
    pub mean_loss: f32,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}
