//! Grid registration in projected coordinates

use crate::crs::ProjectedBounds;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Placement of a regular north-up grid in projected metres.
///
/// Cell `(row, col)` is centered on
/// ```text
/// x = x_min + col * dx
/// y = y_min + row * dy
/// ```
/// so the outer cells straddle the projected extent by half a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub x_min: f64,
    pub y_min: f64,
    pub dx: f64,
    pub dy: f64,
    pub n_cols: usize,
    pub n_rows: usize,
}

impl GridGeometry {
    pub fn new(x_min: f64, y_min: f64, dx: f64, dy: f64, n_cols: usize, n_rows: usize) -> Self {
        Self {
            x_min,
            y_min,
            dx,
            dy,
            n_cols,
            n_rows,
        }
    }

    /// Cover a projected extent with square cells of `cell_size`.
    ///
    /// `n = (max - min) / cell + 1`; the upper bounds snap to
    /// `min + (n - 1) * cell`.
    pub fn covering(bounds: &ProjectedBounds, cell_size: f64) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(Error::bad_parameter(
                "cell_size",
                cell_size,
                "must be positive and finite",
            ));
        }
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return Err(Error::bad_parameter(
                "bounds",
                format!("{:.3} x {:.3} m", bounds.width(), bounds.height()),
                "projected extent is degenerate",
            ));
        }
        let n_cols = cells_along(bounds.width(), cell_size)?;
        let n_rows = cells_along(bounds.height(), cell_size)?;
        Ok(Self::new(
            bounds.x_min,
            bounds.y_min,
            cell_size,
            cell_size,
            n_cols,
            n_rows,
        ))
    }

    /// Center of the last column
    pub fn x_max(&self) -> f64 {
        self.x_min + (self.n_cols.saturating_sub(1)) as f64 * self.dx
    }

    /// Center of the last row
    pub fn y_max(&self) -> f64 {
        self.y_min + (self.n_rows.saturating_sub(1)) as f64 * self.dy
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    pub fn len(&self) -> usize {
        self.n_rows.saturating_mul(self.n_cols)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Projected center of cell `(row, col)`
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.x_min + col as f64 * self.dx,
            self.y_min + row as f64 * self.dy,
        )
    }

    /// Signed (row, col) of the cell whose center is nearest to `(x, y)`.
    /// May lie outside the grid.
    pub fn signed_index(&self, x: f64, y: f64) -> (i64, i64) {
        let col = ((x - self.x_min + 0.5 * self.dx) / self.dx).floor();
        let row = ((y - self.y_min + 0.5 * self.dy) / self.dy).floor();
        (row as i64, col as i64)
    }

    /// (row, col) containing `(x, y)`, or `None` outside the grid.
    pub fn cell_of(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        let (row, col) = self.signed_index(x, y);
        if row < 0 || col < 0 || row as usize >= self.n_rows || col as usize >= self.n_cols {
            return None;
        }
        Some((row as usize, col as usize))
    }
}

/// `floor(span / cell) + 1`, or [`Error::MemoryFailure`] when the count
/// does not fit in memory indices.
fn cells_along(span: f64, cell_size: f64) -> Result<usize> {
    let ratio = (span / cell_size).floor();
    if !ratio.is_finite() || ratio >= usize::MAX as f64 {
        return Err(Error::MemoryFailure {
            what: "grid",
            cells: usize::MAX,
        });
    }
    (ratio as usize).checked_add(1).ok_or(Error::MemoryFailure {
        what: "grid",
        cells: usize::MAX,
    })
}
