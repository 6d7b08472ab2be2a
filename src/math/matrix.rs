use rand::Rng;
use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// Dense row-major `f32` matrix. Shape is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f32>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Fills a `rows × cols` matrix with independent draws from U(-bound, bound).
    ///
    /// Each entry is `(u - 0.5) * 2 * bound` with `u` uniform on [0, 1).
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, bound: f32, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        res.fill_uniform(bound, rng);
        res
    }

    /// Redraws every entry in place from U(-bound, bound).
    pub fn fill_uniform<R: Rng + ?Sized>(&mut self, bound: f32, rng: &mut R) {
        for row in self.data.iter_mut() {
            for value in row.iter_mut() {
                *value = (rng.gen::<f32>() - 0.5) * 2.0 * bound;
            }
        }
    }

    /// Builds a matrix from nested rows. Rejects empty input and ragged rows.
    pub fn from_data(data: Vec<Vec<f32>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map(Vec::len).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidConfig(format!(
                "matrix must be non-empty, got {rows}x{cols}"
            )));
        }
        if let Some(bad) = data.iter().position(|row| row.len() != cols) {
            return Err(Error::InvalidConfig(format!(
                "row {bad} has {} columns, expected {cols}",
                data[bad].len()
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from a flat row-major buffer of exactly `rows * cols` values.
    pub fn from_flat(rows: usize, cols: usize, values: &[f32]) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidConfig(format!(
                "matrix must be non-empty, got {rows}x{cols}"
            )));
        }
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::InvalidConfig(format!("matrix shape {rows}x{cols} overflows")))?;
        if values.len() != expected {
            return Err(Error::DimensionMismatch {
                what: "matrix values",
                expected,
                actual: values.len(),
            });
        }
        Matrix::from_data(values.chunks(cols).map(<[f32]>::to_vec).collect())
    }

    /// All entries in row-major order.
    pub fn iter_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().flat_map(|row| row.iter().copied())
    }

    pub fn to_flat(&self) -> Vec<f32> {
        self.iter_values().collect()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.data[row][col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        &mut self.data[row][col]
    }
}
