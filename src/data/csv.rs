//! Dataset file reading and writing.
//!
//! Format: one sample per line, comma-separated, no header.
//! - field 0:      the label, mapped to a class index by a [`LabelMap`]
//! - fields 1..=n: exactly `grid_side * grid_side` pixel values (0 or 1)
//!
//! Lines that do not fit (wrong field count, a pixel other than 0 or 1, unmapped
//! label) are skipped and counted rather than failing the whole load.
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::data::grid::PixelGrid;
use crate::data::labels::LabelMap;
use crate::data::sample::{Dataset, Sample};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Why a line was left out of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    FieldCount { expected: usize, actual: usize },
    BadPixel,
    UnmappedLabel,
}

/// Samples that parsed, plus how many lines were skipped.
#[derive(Debug, Clone, Default)]
pub struct ParsedDataset {
    pub samples: Dataset,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parses dataset text into one-hot samples sized for `labels.class_count()` classes.
pub fn parse_dataset(text: &str, grid_side: usize, labels: &dyn LabelMap) -> ParsedDataset {
    let mut parsed = ParsedDataset::default();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line, grid_side, labels) {
            Ok(sample) => parsed.samples.push(sample),
            Err(reason) => {
                debug!(line = line_no + 1, ?reason, "skipping dataset line");
                parsed.skipped += 1;
            }
        }
    }

    parsed
}

/// Reads and parses a dataset file. Only I/O failures are errors.
pub fn read_dataset<P: AsRef<Path>>(
    path: P,
    grid_side: usize,
    labels: &dyn LabelMap,
) -> Result<ParsedDataset> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_dataset(&text, grid_side, labels))
}

/// Appends one `label,p0,p1,...` line to the dataset file, creating it if needed.
pub fn append_sample<P: AsRef<Path>>(path: P, label: &str, grid: &PixelGrid) -> Result<()> {
    let label = label.trim();
    if label.is_empty() || label.contains(',') || label.contains('\n') {
        return Err(Error::InvalidConfig(format!(
            "label {label:?} cannot be stored in a dataset line"
        )));
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{label},{}", grid.csv_fields())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn parse_line(
    line: &str,
    grid_side: usize,
    labels: &dyn LabelMap,
) -> std::result::Result<Sample, SkipReason> {
    let fields: Vec<&str> = line.split(',').collect();
    let pixels = grid_side * grid_side;
    if fields.len() != pixels + 1 {
        return Err(SkipReason::FieldCount { expected: pixels + 1, actual: fields.len() });
    }

    let class = labels.index_of(fields[0]).ok_or(SkipReason::UnmappedLabel)?;

    let input = fields[1..].iter()
        .map(|f| parse_pixel(f).ok_or(SkipReason::BadPixel))
        .collect::<std::result::Result<Vec<f32>, _>>()?;

    Sample::one_hot(input, class, labels.class_count()).map_err(|_| SkipReason::UnmappedLabel)
}

/// Pixels are binary; anything else, including `NaN` and `inf`, is rejected.
fn parse_pixel(field: &str) -> Option<f32> {
    let value = field.trim().parse::<f32>().ok()?;
    (value == 0.0 || value == 1.0).then_some(value)
}
