use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural validation failures. Anything past `Instance` construction
/// is total and cannot fail at runtime.
#[derive(Debug, Error)]
pub enum ZoningError {
    #[error("grid must have at least one row and one column")]
    EmptyGrid,
    #[error("grid is not rectangular: row {row} has {got} values, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("zone count must be at least 1")]
    ZeroZones,
    #[error("zone count {zones} exceeds cell count {cells}")]
    TooManyZones { zones: usize, cells: usize },
    #[error("restart count must be at least 1")]
    NoRestarts,
}

/// Immutable problem input: a rectangular grid of measurements (e.g. a
/// vegetation or soil index sampled over a field) and the number of
/// zones `p` to partition it into.
#[derive(Clone, Debug)]
pub struct Instance {
    grid: Array2<f64>,
    zone_count: usize,
}

impl Instance {
    pub fn new(grid: Array2<f64>, zone_count: usize) -> Result<Self, ZoningError> {
        let (rows, cols) = grid.dim();
        if rows == 0 || cols == 0 {
            return Err(ZoningError::EmptyGrid);
        }
        if zone_count == 0 {
            return Err(ZoningError::ZeroZones);
        }
        if zone_count > rows * cols {
            return Err(ZoningError::TooManyZones {
                zones: zone_count,
                cells: rows * cols,
            });
        }
        Ok(Self { grid, zone_count })
    }

    /// Builds an instance from row vectors, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>, zone_count: usize) -> Result<Self, ZoningError> {
        if rows.is_empty() {
            return Err(ZoningError::EmptyGrid);
        }
        let cols = rows[0].len();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(ZoningError::RaggedGrid {
                    row,
                    expected: cols,
                    got: values.len(),
                });
            }
        }
        let mut grid = Array2::zeros((rows.len(), cols));
        for (r, values) in rows.iter().enumerate() {
            for (c, &v) in values.iter().enumerate() {
                grid[[r, c]] = v;
            }
        }
        Self::new(grid, zone_count)
    }

    pub fn rows(&self) -> usize {
        self.grid.nrows()
    }

    pub fn cols(&self) -> usize {
        self.grid.ncols()
    }

    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    pub fn zone_count(&self) -> usize {
        self.zone_count
    }

    pub fn grid(&self) -> &Array2<f64> {
        &self.grid
    }

    /// Population variance of the whole grid. The CLI layer multiplies
    /// this by `alpha` to obtain the absolute homogeneity threshold.
    pub fn global_variance(&self) -> f64 {
        let n = self.grid.len() as f64;
        let mean = self.grid.sum() / n;
        self.grid.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
    }
}

/// A candidate partition: one zone id per grid cell plus the cost of the
/// partition under the current objective. `cost` is `+∞` until first
/// evaluated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Solution {
    pub assignment: Array2<usize>,
    pub cost: f64,
}

impl Solution {
    pub fn unevaluated(assignment: Array2<usize>) -> Self {
        Self {
            assignment,
            cost: f64::INFINITY,
        }
    }

    /// The assignment as plain row vectors, for display and JSON output.
    pub fn zone_rows(&self) -> Vec<Vec<usize>> {
        self.assignment
            .outer_iter()
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Draws every cell's zone id independently and uniformly from `[0, p)`.
/// The RNG is an explicit handle so that restarts stay independent and
/// tests stay reproducible.
pub fn random_solution<R: Rng + ?Sized>(instance: &Instance, rng: &mut R) -> Solution {
    let p = instance.zone_count();
    let assignment =
        Array2::from_shape_fn((instance.rows(), instance.cols()), |_| rng.gen_range(0..p));
    Solution::unevaluated(assignment)
}
