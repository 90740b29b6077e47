//! Grid geometry, cell accumulators and the materialized bathymetry grid

mod cell;
mod geotransform;
mod grid;

pub use cell::{GridCell, WEIGHT_TINY};
pub use geotransform::GridGeometry;
pub use grid::{BathymetryGrid, CellUpdate, GridAlgorithm, NODATA, ValueRange};
