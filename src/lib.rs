pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod persist;
pub mod data;
pub mod metrics;
pub mod config;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use activation::activation::HiddenGradientMask;
pub use network::{ForwardPass, Model, PredictionResult};
pub use loss::cross_entropy::CrossEntropyLoss;
pub use optim::sgd::Sgd;
pub use train::{train, train_loop, BackpropOrder, EpochStats, TrainConfig, TrainOutcome};
pub use data::{LabelMap, PixelGrid, Sample};
pub use metrics::{evaluate, Evaluation};
