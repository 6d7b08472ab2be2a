use std::fmt;

/// Everything that can go wrong inside the classifier core and its data collaborators.
#[derive(Debug)]
pub enum Error {
    /// Bad construction or training arguments (zero layer size, non-positive learning rate, ...).
    InvalidConfig(String),
    /// A vector or matrix length disagrees with the size the model expects.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Training or evaluation was asked to run over zero samples.
    EmptyDataset,
    /// A per-sample loss was NaN or infinite (only reported when finiteness checks are on).
    NonFiniteLoss { epoch: usize, sample: usize },
    /// A persisted model or data file is structurally invalid.
    Format(String),
    /// An image could not be decoded or is too small for the requested grid.
    Image(String),
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::DimensionMismatch { what, expected, actual } => {
                write!(f, "dimension mismatch for {what}: expected {expected}, got {actual}")
            }
            Error::EmptyDataset => write!(f, "nothing to train on: dataset is empty"),
            Error::NonFiniteLoss { epoch, sample } => {
                write!(f, "non-finite loss at epoch {epoch}, sample {sample}")
            }
            Error::Format(msg) => write!(f, "invalid format: {msg}"),
            Error::Image(msg) => write!(f, "image error: {msg}"),
            Error::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::Format(err.to_string())
        }
    }
}

/// Returns `Ok(())` when `actual == expected`, a `DimensionMismatch` otherwise.
pub(crate) fn ensure_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { what, expected, actual })
    }
}
