use std::path::Path;

use image::DynamicImage;

use crate::error::{Error, Result};

/// Pixels with luma below this count as ink.
pub const INK_LUMA: u8 = 128;
/// A cell is ink when more than this fraction of its pixels are ink.
pub const INK_RATIO: f64 = 0.2;

/// Square grid of binary pixels: 1 = ink, 0 = background. Row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    side: usize,
    cells: Vec<u8>,
}

impl PixelGrid {
    /// Blank `side × side` grid. `side` must be at least 1.
    pub fn new(side: usize) -> Result<PixelGrid> {
        if side == 0 {
            return Err(Error::InvalidConfig("grid side must be at least 1".into()));
        }
        Ok(PixelGrid { side, cells: vec![0; side * side] })
    }

    /// Builds a grid from rows of 0/1 values. Every row must have `rows.len()` cells.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<PixelGrid> {
        let side = rows.len();
        if side == 0 {
            return Err(Error::InvalidConfig("grid must have at least one row".into()));
        }
        let mut cells = Vec::with_capacity(side * side);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != side {
                return Err(Error::InvalidConfig(format!(
                    "grid row {y} has {} cells, expected {side}",
                    row.len()
                )));
            }
            if let Some(&bad) = row.iter().find(|&&c| c > 1) {
                return Err(Error::InvalidConfig(format!(
                    "grid row {y} holds {bad}; cells must be 0 or 1"
                )));
            }
            cells.extend(row);
        }
        Ok(PixelGrid { side, cells })
    }

    /// Downsamples an image to `side × side` cells.
    ///
    /// Each cell covers a block of source pixels; it becomes ink when more than
    /// [`INK_RATIO`] of that block is darker than [`INK_LUMA`].
    pub fn from_image(img: &DynamicImage, side: usize) -> Result<PixelGrid> {
        let gray = img.to_luma8();
        let (width, height) = (gray.width() as usize, gray.height() as usize);
        if side == 0 || width < side || height < side {
            return Err(Error::Image(format!(
                "{width}x{height} image is too small for a {side}x{side} grid"
            )));
        }

        let mut grid = PixelGrid::new(side)?;
        for y in 0..side {
            let (y0, y1) = (y * height / side, (y + 1) * height / side);
            for x in 0..side {
                let (x0, x1) = (x * width / side, (x + 1) * width / side);
                let mut ink = 0usize;
                for py in y0..y1 {
                    for px in x0..x1 {
                        if gray.get_pixel(px as u32, py as u32).0[0] < INK_LUMA {
                            ink += 1;
                        }
                    }
                }
                let area = (x1 - x0) * (y1 - y0);
                if ink as f64 / area as f64 > INK_RATIO {
                    grid.set(x, y, true);
                }
            }
        }
        Ok(grid)
    }

    /// Opens an image file and downsamples it with [`PixelGrid::from_image`].
    pub fn load_image<P: AsRef<Path>>(path: P, side: usize) -> Result<PixelGrid> {
        let img = image::open(path)?;
        PixelGrid::from_image(&img, side)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.side + x] == 1
    }

    pub fn set(&mut self, x: usize, y: usize, ink: bool) {
        self.cells[y * self.side + x] = u8::from(ink);
    }

    /// Flattens the grid row-major into a model input vector.
    pub fn to_input(&self) -> Vec<f32> {
        self.cells.iter().map(|&c| f32::from(c)).collect()
    }

    /// Cell values as CSV fields, row-major.
    pub fn csv_fields(&self) -> String {
        self.cells.iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Text preview, one line per row: `██` for ink, `░░` for background.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() * 6 + self.side);
        for row in self.cells.chunks(self.side) {
            for &c in row {
                out.push_str(if c == 1 { "██" } else { "░░" });
            }
            out.push('\n');
        }
        out
    }
}
