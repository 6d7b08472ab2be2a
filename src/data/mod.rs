pub mod csv;
pub mod grid;
pub mod labels;
pub mod sample;

pub use csv::{append_sample, parse_dataset, read_dataset, ParsedDataset};
pub use grid::PixelGrid;
pub use labels::{Alphanumeric, LabelMap, LabelScheme, SymbolSet};
pub use sample::{split_holdout, Dataset, Sample};
