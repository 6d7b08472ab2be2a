pub mod trainer;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;
mod step;

pub use trainer::train;
pub use epoch_stats::EpochStats;
pub use train_config::{BackpropOrder, TrainConfig};
pub use loop_fn::{train_loop, TrainOutcome};
