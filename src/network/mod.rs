pub mod model;
pub mod forward;
pub mod prediction;

pub use model::Model;
pub use forward::ForwardPass;
pub use prediction::{argmax, PredictionResult};
