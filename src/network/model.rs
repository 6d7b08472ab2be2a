use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ensure_len, Error, Result};
use crate::math::matrix::Matrix;

/// Initial weights are drawn from U(-INIT_BOUND, INIT_BOUND).
pub const INIT_BOUND: f32 = 0.1;

/// Learned parameters of the single-hidden-layer classifier.
///
/// - `w1`: `input_size × hidden_size`, input-to-hidden weights
/// - `b1`: `hidden_size` hidden biases
/// - `w2`: `hidden_size × output_size`, hidden-to-output weights
/// - `b2`: `output_size` output biases
///
/// Shapes never change after construction. The random source used to
/// initialise the weights is borrowed for the duration of the constructor
/// and is not part of the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    pub(crate) w1: Matrix,
    pub(crate) b1: Vec<f32>,
    pub(crate) w2: Matrix,
    pub(crate) b2: Vec<f32>,
}

impl Model {
    /// Allocates a model with uniformly random weights and zero biases.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<Model> {
        validate_sizes(input_size, hidden_size, output_size)?;
        Ok(Model {
            input_size,
            hidden_size,
            output_size,
            w1: Matrix::uniform(input_size, hidden_size, INIT_BOUND, rng),
            b1: vec![0.0; hidden_size],
            w2: Matrix::uniform(hidden_size, output_size, INIT_BOUND, rng),
            b2: vec![0.0; output_size],
        })
    }

    /// Same as [`Model::new`] with a `StdRng` seeded from `seed`.
    pub fn with_seed(input_size: usize, hidden_size: usize, output_size: usize, seed: u64) -> Result<Model> {
        let mut rng = StdRng::seed_from_u64(seed);
        Model::new(input_size, hidden_size, output_size, &mut rng)
    }

    /// Assembles a model from explicit parameters, checking every shape.
    pub fn from_parts(w1: Matrix, b1: Vec<f32>, w2: Matrix, b2: Vec<f32>) -> Result<Model> {
        let (input_size, hidden_size, output_size) = (w1.rows, w1.cols, w2.cols);
        validate_sizes(input_size, hidden_size, output_size)?;
        ensure_len("w1 rows", input_size, w1.data.len())?;
        for row in &w1.data {
            ensure_len("w1 columns", hidden_size, row.len())?;
        }
        ensure_len("b1", hidden_size, b1.len())?;
        ensure_len("w2 rows", hidden_size, w2.rows)?;
        ensure_len("w2 rows", hidden_size, w2.data.len())?;
        for row in &w2.data {
            ensure_len("w2 columns", output_size, row.len())?;
        }
        ensure_len("b2", output_size, b2.len())?;
        Ok(Model { input_size, hidden_size, output_size, w1, b1, w2, b2 })
    }

    /// Redraws both weight matrices and zeroes the biases, keeping every shape.
    ///
    /// A loaded model carries no random source; callers supply a fresh one here.
    pub fn reinitialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.w1.fill_uniform(INIT_BOUND, rng);
        self.w2.fill_uniform(INIT_BOUND, rng);
        self.b1.iter_mut().for_each(|b| *b = 0.0);
        self.b2.iter_mut().for_each(|b| *b = 0.0);
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn w1(&self) -> &Matrix {
        &self.w1
    }

    pub fn b1(&self) -> &[f32] {
        &self.b1
    }

    pub fn w2(&self) -> &Matrix {
        &self.w2
    }

    pub fn b2(&self) -> &[f32] {
        &self.b2
    }
}

fn validate_sizes(input_size: usize, hidden_size: usize, output_size: usize) -> Result<()> {
    if input_size == 0 || hidden_size == 0 || output_size == 0 {
        return Err(Error::InvalidConfig(format!(
            "layer sizes must be > 0, got input={input_size} hidden={hidden_size} output={output_size}"
        )));
    }
    Ok(())
}
