//! Compact binary model file.
//!
//! # Layout (all integers and floats big-endian)
//! ```text
//! bytes  0-3:   "GMLP"       magic
//! bytes  4-7:   version      (u32, currently 1)
//! bytes  8-11:  input_size   (u32)
//! bytes 12-15:  hidden_size  (u32)
//! bytes 16-19:  output_size  (u32)
//! bytes 20..:   w1  input_size * hidden_size f32, row-major
//!               b1  hidden_size f32
//!               w2  hidden_size * output_size f32, row-major
//!               b2  output_size f32
//! ```
//!
//! Floats are stored as their IEEE-754 bit patterns, so a save/load cycle is
//! bit-exact. Nothing may follow `b2`.
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::model::Model;

pub const MAGIC: [u8; 4] = *b"GMLP";
pub const FORMAT_VERSION: u32 = 1;

/// Upper bound on the floats reserved up front, so a corrupt header cannot
/// trigger a huge allocation before the payload proves it exists.
const MAX_PREALLOC: usize = 1 << 20;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl Model {
    /// Writes the model in the binary format to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&MAGIC)?;
        write_u32(writer, FORMAT_VERSION)?;
        for size in [self.input_size(), self.hidden_size(), self.output_size()] {
            let size = u32::try_from(size)
                .map_err(|_| Error::Format(format!("dimension {size} does not fit in u32")))?;
            write_u32(writer, size)?;
        }
        let params = self.w1.iter_values()
            .chain(self.b1.iter().copied())
            .chain(self.w2.iter_values())
            .chain(self.b2.iter().copied());
        for value in params {
            writer.write_all(&value.to_bits().to_be_bytes())?;
        }
        Ok(())
    }

    /// Reads a model previously written by [`Model::write_to`].
    ///
    /// The reader must end right after the last bias.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Model> {
        let mut magic = [0u8; 4];
        read_exact(reader, &mut magic, "magic")?;
        if magic != MAGIC {
            return Err(Error::Format(format!(
                "bad magic {:02X?}, expected {:02X?}",
                magic, MAGIC
            )));
        }

        let version = read_u32(reader, "version")?;
        if version != FORMAT_VERSION {
            return Err(Error::Format(format!(
                "unsupported model version {version}; expected {FORMAT_VERSION}"
            )));
        }

        let input_size = read_u32(reader, "input_size")? as usize;
        let hidden_size = read_u32(reader, "hidden_size")? as usize;
        let output_size = read_u32(reader, "output_size")? as usize;
        if input_size == 0 || hidden_size == 0 || output_size == 0 {
            return Err(Error::Format(format!(
                "declared sizes must be > 0, got {input_size}x{hidden_size}x{output_size}"
            )));
        }

        let w1 = read_f32s(reader, checked_area(input_size, hidden_size)?, "w1")?;
        let b1 = read_f32s(reader, hidden_size, "b1")?;
        let w2 = read_f32s(reader, checked_area(hidden_size, output_size)?, "w2")?;
        let b2 = read_f32s(reader, output_size, "b2")?;

        let mut probe = [0u8; 1];
        if reader.read(&mut probe)? != 0 {
            return Err(Error::Format(
                "trailing data after output biases; declared sizes do not match payload".into(),
            ));
        }

        let w1 = Matrix::from_flat(input_size, hidden_size, &w1)?;
        let w2 = Matrix::from_flat(hidden_size, output_size, &w2)?;
        Model::from_parts(w1, b1, w2, b2)
    }

    /// Saves the model to `path`, creating or truncating the file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!(path = %path.display(), "model saved");
        Ok(())
    }

    /// Loads a model from `path`. A failure never yields a partial model.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Model> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let model = Model::read_from(&mut reader)?;
        debug!(
            path = %path.display(),
            input = model.input_size(),
            hidden = model.hidden_size(),
            output = model.output_size(),
            "model loaded"
        );
        Ok(model)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn write_u32<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

/// `read_exact` with truncation reported as a format error naming the field.
fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], field: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            Error::Format(format!("file truncated while reading {field}"))
        }
        _ => Error::Io(e),
    })
}

fn read_u32<R: Read>(reader: &mut R, field: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf, field)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_f32s<R: Read>(reader: &mut R, count: usize, field: &str) -> Result<Vec<f32>> {
    let mut values = Vec::with_capacity(count.min(MAX_PREALLOC));
    let mut buf = [0u8; 4];
    for _ in 0..count {
        read_exact(reader, &mut buf, field)?;
        values.push(f32::from_bits(u32::from_be_bytes(buf)));
    }
    Ok(values)
}

fn checked_area(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .ok_or_else(|| Error::Format(format!("matrix shape {rows}x{cols} overflows")))
}
