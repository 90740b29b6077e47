//! Production bathymetry grid

use crate::crs::Projection;
use crate::error::{Error, Result};
use crate::raster::{GridCell, GridGeometry};
use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Value written to empty cells of the materialized arrays.
pub const NODATA: f64 = -10_000_000.0;

/// How soundings are combined into cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridAlgorithm {
    /// Unit-weight mean of the soundings whose center falls in the cell
    SimpleMean,
    /// Mean weighted by each beam's Gaussian footprint overlap
    #[default]
    Footprint,
    /// Shallowest sounding of the cell
    ShoalBias,
}

/// Freshly materialized state of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellUpdate {
    pub row: usize,
    pub col: usize,
    /// Mean depth, `None` when the cell is empty
    pub value: Option<f64>,
    pub stddev: Option<f64>,
}

/// Range of a materialized quantity over occupied cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    fn widen(range: &mut Option<ValueRange>, v: f64) {
        match range {
            Some(r) => {
                r.min = r.min.min(v);
                r.max = r.max.max(v);
            }
            None => *range = Some(ValueRange { min: v, max: v }),
        }
    }
}

/// Accumulator grid with its materialized depth and stddev arrays.
///
/// Arrays are indexed `(row, col)`, row along northing.
#[derive(Debug, Clone)]
pub struct BathymetryGrid {
    geometry: GridGeometry,
    projection: Projection,
    algorithm: GridAlgorithm,
    cells: Array2<GridCell>,
    values: Array2<f64>,
    stddevs: Array2<f64>,
    value_range: Option<ValueRange>,
    stddev_range: Option<ValueRange>,
    /// Every depth feeding a shoal-bias cell, so removal can recover
    /// the next shallowest
    shoal_depths: HashMap<(usize, usize), Vec<f64>>,
}

/// Allocate a filled array, reporting allocation failure instead of aborting.
fn try_filled<T: Clone>(shape: (usize, usize), fill: T, what: &'static str) -> Result<Array2<T>> {
    let cells = shape.0.checked_mul(shape.1).ok_or(Error::MemoryFailure {
        what,
        cells: usize::MAX,
    })?;
    let mut data = Vec::new();
    data.try_reserve_exact(cells)
        .map_err(|_| Error::MemoryFailure { what, cells })?;
    data.resize(cells, fill);
    Array2::from_shape_vec(shape, data).map_err(|_| Error::MemoryFailure { what, cells })
}

impl BathymetryGrid {
    /// Allocate an empty grid.
    ///
    /// Fails with [`Error::MemoryFailure`] when the arrays cannot be reserved.
    pub fn try_new(
        geometry: GridGeometry,
        projection: Projection,
        algorithm: GridAlgorithm,
    ) -> Result<Self> {
        let shape = geometry.shape();
        Ok(Self {
            geometry,
            projection,
            algorithm,
            cells: try_filled(shape, GridCell::default(), "grid accumulators")?,
            values: try_filled(shape, NODATA, "grid values")?,
            stddevs: try_filled(shape, NODATA, "grid standard deviations")?,
            value_range: None,
            stddev_range: None,
            shoal_depths: HashMap::new(),
        })
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn algorithm(&self) -> GridAlgorithm {
        self.algorithm
    }

    pub fn nodata(&self) -> f64 {
        NODATA
    }

    pub fn rows(&self) -> usize {
        self.geometry.n_rows
    }

    pub fn cols(&self) -> usize {
        self.geometry.n_cols
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> Error {
        Error::IndexOutOfBounds {
            row,
            col,
            rows: self.rows(),
            cols: self.cols(),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&GridCell> {
        self.cells
            .get((row, col))
            .ok_or_else(|| self.out_of_bounds(row, col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut GridCell> {
        let err = self.out_of_bounds(row, col);
        self.cells.get_mut((row, col)).ok_or(err)
    }

    /// Materialized mean depth, `None` for an empty or outside cell.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied().filter(|&v| v != NODATA)
    }

    pub fn stddev(&self, row: usize, col: usize) -> Option<f64> {
        let filled = self.value(row, col).is_some();
        self.stddevs.get((row, col)).copied().filter(|_| filled)
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn stddevs(&self) -> ArrayView2<'_, f64> {
        self.stddevs.view()
    }

    pub fn value_range(&self) -> Option<ValueRange> {
        self.value_range
    }

    pub fn stddev_range(&self) -> Option<ValueRange> {
        self.stddev_range
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Zero all accumulators and materialized values.
    pub fn clear(&mut self) {
        self.cells.fill(GridCell::default());
        self.values.fill(NODATA);
        self.stddevs.fill(NODATA);
        self.value_range = None;
        self.stddev_range = None;
        self.shoal_depths.clear();
    }

    /// Offer a depth to a shoal-bias cell.
    pub fn add_shoal(&mut self, row: usize, col: usize, depth: f64) -> Result<()> {
        self.cell_mut(row, col)?.keep_shoalest(depth);
        self.shoal_depths.entry((row, col)).or_default().push(depth);
        Ok(())
    }

    /// Withdraw a depth from a shoal-bias cell; the cell falls back to the
    /// shallowest remaining depth, or empties.
    pub fn remove_shoal(&mut self, row: usize, col: usize, depth: f64) -> Result<()> {
        self.cell(row, col)?;
        let Some(depths) = self.shoal_depths.get_mut(&(row, col)) else {
            return Ok(());
        };
        if let Some(pos) = depths.iter().position(|&d| d == depth) {
            depths.swap_remove(pos);
        }
        let mut cell = GridCell::default();
        for &d in depths.iter() {
            cell.keep_shoalest(d);
        }
        if depths.is_empty() {
            self.shoal_depths.remove(&(row, col));
        }
        self.cells[(row, col)] = cell;
        Ok(())
    }

    /// Recompute one cell from its accumulators, widening the ranges.
    pub fn materialize_cell(&mut self, row: usize, col: usize) -> Result<CellUpdate> {
        let state = self.cell(row, col)?.materialize();
        let (value, stddev) = match state {
            Some((v, s)) => {
                ValueRange::widen(&mut self.value_range, v);
                ValueRange::widen(&mut self.stddev_range, s);
                (v, s)
            }
            None => (NODATA, NODATA),
        };
        self.values[(row, col)] = value;
        self.stddevs[(row, col)] = stddev;
        Ok(CellUpdate {
            row,
            col,
            value: state.map(|s| s.0),
            stddev: state.map(|s| s.1),
        })
    }

    /// Recompute every cell and reset the ranges from scratch.
    pub fn materialize_all(&mut self) {
        self.value_range = None;
        self.stddev_range = None;
        let (value_range, stddev_range) = (&mut self.value_range, &mut self.stddev_range);
        Zip::from(&self.cells)
            .and(&mut self.values)
            .and(&mut self.stddevs)
            .for_each(|cell, value, stddev| match cell.materialize() {
                Some((v, s)) => {
                    *value = v;
                    *stddev = s;
                    ValueRange::widen(value_range, v);
                    ValueRange::widen(stddev_range, s);
                }
                None => {
                    *value = NODATA;
                    *stddev = NODATA;
                }
            });
    }
}
