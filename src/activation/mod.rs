pub mod activation;

pub use activation::{leaky_relu, softmax, HiddenGradientMask, LEAKY_SLOPE};
