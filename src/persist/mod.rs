pub mod binary;
pub mod json;

pub use binary::{FORMAT_VERSION, MAGIC};
pub use json::SerializedModel;
