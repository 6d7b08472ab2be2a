//! Human-readable JSON export of a model.
//!
//! The file holds a versioned `SerializedModel` rather than the in-memory
//! `Model`, and every field is validated again on the way back in.
//! JSON has no NaN or infinity, so models holding them are refused on export;
//! the binary format keeps them bit-exact.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::model::Model;

pub const JSON_FORMAT_VERSION: u32 = 1;

/// On-disk JSON shape. Matrices are flattened row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedModel {
    pub format_version: u32,
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub w1: Vec<f32>,
    pub b1: Vec<f32>,
    pub w2: Vec<f32>,
    pub b2: Vec<f32>,
}

impl From<&Model> for SerializedModel {
    fn from(model: &Model) -> Self {
        SerializedModel {
            format_version: JSON_FORMAT_VERSION,
            input_size: model.input_size(),
            hidden_size: model.hidden_size(),
            output_size: model.output_size(),
            w1: model.w1().to_flat(),
            b1: model.b1().to_vec(),
            w2: model.w2().to_flat(),
            b2: model.b2().to_vec(),
        }
    }
}

impl TryFrom<SerializedModel> for Model {
    type Error = Error;

    fn try_from(value: SerializedModel) -> Result<Model> {
        if value.format_version != JSON_FORMAT_VERSION {
            return Err(Error::Format(format!(
                "unsupported model format_version {}; expected {}",
                value.format_version, JSON_FORMAT_VERSION
            )));
        }
        let w1 = Matrix::from_flat(value.input_size, value.hidden_size, &value.w1)
            .map_err(|e| Error::Format(format!("w1: {e}")))?;
        let w2 = Matrix::from_flat(value.hidden_size, value.output_size, &value.w2)
            .map_err(|e| Error::Format(format!("w2: {e}")))?;
        Model::from_parts(w1, value.b1, w2, value.b2)
            .map_err(|e| Error::Format(e.to_string()))
    }
}

impl Model {
    pub fn to_json_string(&self) -> Result<String> {
        self.ensure_finite_for_json()?;
        Ok(serde_json::to_string_pretty(&SerializedModel::from(self))?)
    }

    pub fn from_json_str(s: &str) -> Result<Model> {
        let ser: SerializedModel = serde_json::from_str(s)?;
        ser.try_into()
    }

    /// Serializes the model to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.ensure_finite_for_json()?;
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &SerializedModel::from(self))?;
        Ok(())
    }

    /// Deserializes a model from a JSON file previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Model> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let ser: SerializedModel = serde_json::from_reader(reader)?;
        ser.try_into()
    }

    fn ensure_finite_for_json(&self) -> Result<()> {
        let params = [
            ("w1", self.w1().to_flat()),
            ("b1", self.b1().to_vec()),
            ("w2", self.w2().to_flat()),
            ("b2", self.b2().to_vec()),
        ];
        for (name, values) in params {
            if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
                return Err(Error::Format(format!(
                    "{name}[{pos}] is {}; JSON cannot represent non-finite values",
                    values[pos]
                )));
            }
        }
        Ok(())
    }
}
