//! Incremental gridding of corrected soundings
//!
//! Each [`GridAlgorithm`] has one [`Accumulate`] implementation, picked once
//! per grid. A beam is added when it becomes accepted and removed when it
//! is rejected, so edits update only the cells the beam touches.

mod builder;

pub use builder::{plan_grid, recompute_full, survey_extent, GridPlan, GridStats, SurveyExtent};

use crate::footprint::{BeamGeometry, Footprint};
use swathgrid_core::raster::{BathymetryGrid, GridAlgorithm};
use swathgrid_core::swath::{Beam, Ping, SwathFile, TopographyType};
use swathgrid_core::Result;

/// Whether a beam enters or leaves the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contribution {
    Add,
    Remove,
}

/// A corrected, projected beam with what the accumulators need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSounding {
    pub xy: (f64, f64),
    pub depth: f64,
    pub nav_xy: (f64, f64),
    pub sensor_depth: f64,
    pub altitude: f64,
    pub beamwidth_across: f64,
    pub beamwidth_along: f64,
}

impl GridSounding {
    /// Gridding view of a beam; `None` until the beam is corrected and
    /// projected.
    pub fn of(file: &SwathFile, ping: &Ping, beam: &Beam) -> Option<Self> {
        let corrected = beam.corrected?;
        Some(Self {
            xy: corrected.xy?,
            depth: corrected.depth,
            nav_xy: ping.nav_xy?,
            sensor_depth: ping.sensor_depth,
            altitude: ping.altitude,
            beamwidth_across: file.beamwidth_across,
            beamwidth_along: file.beamwidth_along,
        })
    }
}

/// How one gridding algorithm folds a sounding into cells.
pub trait Accumulate {
    fn name(&self) -> &'static str;

    /// Add or remove `sounding`, whose center falls in cell `center`.
    ///
    /// Returns the cells whose accumulators changed.
    fn accumulate(
        &self,
        grid: &mut BathymetryGrid,
        sounding: &GridSounding,
        center: (usize, usize),
        contribution: Contribution,
    ) -> Result<Vec<(usize, usize)>>;
}

/// Unit weight in the cell holding the sounding.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMean;

/// Gaussian footprint weights over every cell the beam reaches.
#[derive(Debug, Clone, Copy, Default)]
pub struct FootprintWeighted;

/// Shallowest sounding per cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShoalBias;

impl Accumulate for SimpleMean {
    fn name(&self) -> &'static str {
        "simple mean"
    }

    fn accumulate(
        &self,
        grid: &mut BathymetryGrid,
        sounding: &GridSounding,
        (row, col): (usize, usize),
        contribution: Contribution,
    ) -> Result<Vec<(usize, usize)>> {
        let cell = grid.cell_mut(row, col)?;
        match contribution {
            Contribution::Add => cell.add(1.0, sounding.depth),
            Contribution::Remove => cell.remove(1.0, sounding.depth),
        }
        Ok(vec![(row, col)])
    }
}

impl Accumulate for FootprintWeighted {
    fn name(&self) -> &'static str {
        "footprint"
    }

    fn accumulate(
        &self,
        grid: &mut BathymetryGrid,
        sounding: &GridSounding,
        center: (usize, usize),
        contribution: Contribution,
    ) -> Result<Vec<(usize, usize)>> {
        let footprint = Footprint::from_beam(&BeamGeometry {
            sounding_xy: sounding.xy,
            nav_xy: sounding.nav_xy,
            depth: sounding.depth,
            sensor_depth: sounding.sensor_depth,
            altitude: sounding.altitude,
            beamwidth_across: sounding.beamwidth_across,
            beamwidth_along: sounding.beamwidth_along,
        });
        let weights = footprint.cell_weights(grid.geometry(), sounding.xy, center);
        let mut touched = Vec::with_capacity(weights.len());
        for (row, col, weight) in weights {
            let cell = grid.cell_mut(row, col)?;
            match contribution {
                Contribution::Add => cell.add(weight, sounding.depth),
                Contribution::Remove => cell.remove(weight, sounding.depth),
            }
            touched.push((row, col));
        }
        Ok(touched)
    }
}

impl Accumulate for ShoalBias {
    fn name(&self) -> &'static str {
        "shoal bias"
    }

    fn accumulate(
        &self,
        grid: &mut BathymetryGrid,
        sounding: &GridSounding,
        (row, col): (usize, usize),
        contribution: Contribution,
    ) -> Result<Vec<(usize, usize)>> {
        match contribution {
            Contribution::Add => grid.add_shoal(row, col, sounding.depth)?,
            Contribution::Remove => grid.remove_shoal(row, col, sounding.depth)?,
        }
        Ok(vec![(row, col)])
    }
}

/// Accumulator for a grid algorithm and the instrument that produced a beam.
///
/// Only multibeam swaths follow the configured algorithm; beams from any
/// other instrument always use the simple mean.
pub fn accumulator(algorithm: GridAlgorithm, topography: TopographyType) -> &'static dyn Accumulate {
    static SIMPLE_MEAN: SimpleMean = SimpleMean;
    static FOOTPRINT: FootprintWeighted = FootprintWeighted;
    static SHOAL_BIAS: ShoalBias = ShoalBias;
    match (algorithm, topography) {
        (_, t) if t != TopographyType::Multibeam => &SIMPLE_MEAN,
        (GridAlgorithm::ShoalBias, _) => &SHOAL_BIAS,
        (GridAlgorithm::Footprint, _) => &FOOTPRINT,
        (GridAlgorithm::SimpleMean, _) => &SIMPLE_MEAN,
    }
}

/// Where a beam went.
#[derive(Debug, Clone, PartialEq)]
pub enum GridOutcome {
    /// The sounding lies outside the grid
    Outside,
    /// Cells whose accumulators changed
    Touched(Vec<(usize, usize)>),
}

/// Add or remove one sounding with the grid's algorithm.
pub fn grid_beam(
    grid: &mut BathymetryGrid,
    topography: TopographyType,
    sounding: &GridSounding,
    contribution: Contribution,
) -> Result<GridOutcome> {
    let Some(center) = grid.geometry().cell_of(sounding.xy.0, sounding.xy.1) else {
        return Ok(GridOutcome::Outside);
    };
    let acc = accumulator(grid.algorithm(), topography);
    acc.accumulate(grid, sounding, center, contribution)
        .map(GridOutcome::Touched)
}
