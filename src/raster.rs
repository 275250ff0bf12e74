//! Instance-file parsing.
//!
//! Format: a header line `m n` (row and column counts), followed by `m`
//! lines of `n` whitespace-separated floating-point values.

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use std::fs;
use std::path::Path;

/// Reads a measurement grid from `path`.
pub fn read_grid(path: &Path) -> Result<Array2<f64>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading instance file {}", path.display()))?;
    let grid = parse_grid(&text)
        .with_context(|| format!("parsing instance file {}", path.display()))?;
    tracing::debug!(
        rows = grid.nrows(),
        cols = grid.ncols(),
        "instance grid loaded"
    );
    Ok(grid)
}

/// Parses the `m n` + rows format. Blank lines are ignored.
pub fn parse_grid(text: &str) -> Result<Array2<f64>> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = lines.next().context("missing header line")?;
    let mut dims = header.split_whitespace();
    let rows: usize = dims
        .next()
        .context("missing row count in header")?
        .parse()
        .context("row count is not an integer")?;
    let cols: usize = dims
        .next()
        .context("missing column count in header")?
        .parse()
        .context("column count is not an integer")?;
    if rows == 0 || cols == 0 {
        bail!("grid dimensions must be positive, got {}x{}", rows, cols);
    }

    let mut grid = Array2::zeros((rows, cols));
    for r in 0..rows {
        let line = lines
            .next()
            .with_context(|| format!("missing data row {} of {}", r + 1, rows))?;
        let mut values = line.split_whitespace();
        for c in 0..cols {
            let token = values
                .next()
                .with_context(|| format!("row {} has fewer than {} values", r + 1, cols))?;
            grid[[r, c]] = token
                .parse()
                .with_context(|| format!("bad value {:?} at row {} column {}", token, r + 1, c + 1))?;
        }
        if values.next().is_some() {
            bail!("row {} has more than {} values", r + 1, cols);
        }
    }
    Ok(grid)
}
