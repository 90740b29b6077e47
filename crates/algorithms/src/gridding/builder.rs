//! Full grid rebuilds: extent, projection, cell size and accumulation

use super::{grid_beam, Contribution, GridOutcome, GridSounding};
use swathgrid_core::crs::{GeoBounds, ProjectedBounds, Projection};
use swathgrid_core::raster::{BathymetryGrid, GridGeometry};
use swathgrid_core::swath::SwathFile;
use swathgrid_core::{Error, Result};
use tracing::warn;

/// Geographic extent of the loaded survey with depth/altitude scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyExtent {
    pub bounds: GeoBounds,
    /// Smallest per-file maximum depth
    pub depth_max: f64,
    /// Smallest per-file maximum altitude
    pub altitude_max: f64,
}

/// Projection and grid placement derived from a survey extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPlan {
    pub projection: Projection,
    pub projected: ProjectedBounds,
    pub geometry: GridGeometry,
}

/// Counts from one accumulation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridStats {
    pub gridded: usize,
    pub outside: usize,
    pub failed: usize,
}

/// Combined extent of the given files.
///
/// Depth and altitude maxima are combined with the minimum across files.
/// Fails with [`Error::BadParameter`] when no file has pings or the extent
/// has no area.
pub fn survey_extent<'a>(files: impl IntoIterator<Item = &'a SwathFile>) -> Result<SurveyExtent> {
    let mut extent: Option<SurveyExtent> = None;
    for file_extent in files.into_iter().filter_map(SwathFile::extent) {
        match extent.as_mut() {
            None => {
                extent = Some(SurveyExtent {
                    bounds: file_extent.bounds,
                    depth_max: file_extent.depth_max,
                    altitude_max: file_extent.altitude_max,
                })
            }
            Some(e) => {
                e.bounds.merge(&file_extent.bounds);
                e.depth_max = e.depth_max.min(file_extent.depth_max);
                e.altitude_max = e.altitude_max.min(file_extent.altitude_max);
            }
        }
    }
    let extent = extent.ok_or_else(|| Error::bad_parameter("files", 0, "no loaded soundings"))?;
    if extent.bounds.is_degenerate() {
        let b = extent.bounds;
        return Err(Error::bad_parameter(
            "bounds",
            format!("[{}, {}] x [{}, {}]", b.lon_min, b.lon_max, b.lat_min, b.lat_max),
            "survey extent is degenerate",
        ));
    }
    Ok(extent)
}

/// Choose a projection and cell layout for the extent.
///
/// Without an explicit `cell_size` the cell is 2% of the altitude, else 2%
/// of the depth, else 1/250 of the projected width.
pub fn plan_grid(extent: &SurveyExtent, cell_size: Option<f64>) -> Result<GridPlan> {
    let (lon, lat) = extent.bounds.center();
    let projection = Projection::for_reference(lon, lat)?;
    let projected = projection.project_bounds(&extent.bounds);
    let cell = match cell_size {
        Some(c) => c,
        None if extent.altitude_max > 0.0 => 0.02 * extent.altitude_max,
        None if extent.depth_max > 0.0 => 0.02 * extent.depth_max,
        None => projected.width() / 250.0,
    };
    let geometry = GridGeometry::covering(&projected, cell)?;
    Ok(GridPlan {
        projection,
        projected,
        geometry,
    })
}

/// Clear the grid and accumulate every accepted, corrected beam.
///
/// `files` are slots; empty slots are skipped. Per-beam failures are logged
/// and counted, never propagated.
pub fn recompute_full(
    grid: &mut BathymetryGrid,
    files: &[Option<SwathFile>],
    progress: &mut dyn FnMut(&str),
) -> GridStats {
    grid.clear();
    let mut stats = GridStats::default();
    let total = files.iter().flatten().count();
    for (count, (file_index, file)) in files
        .iter()
        .enumerate()
        .filter_map(|(i, f)| f.as_ref().map(|f| (i, f)))
        .enumerate()
    {
        progress(&format!("Gridding file {} of {}...", count + 1, total));
        for (ping_index, ping) in file.pings.iter().enumerate() {
            for (beam_index, beam) in ping.accepted_beams() {
                let Some(sounding) = GridSounding::of(file, ping, beam) else {
                    continue;
                };
                match grid_beam(grid, file.topography, &sounding, Contribution::Add) {
                    Ok(GridOutcome::Touched(_)) => stats.gridded += 1,
                    Ok(GridOutcome::Outside) => stats.outside += 1,
                    Err(e) => {
                        stats.failed += 1;
                        warn!(
                            file = file_index,
                            ping = ping_index,
                            beam = beam_index,
                            "beam not gridded: {e}"
                        );
                    }
                }
            }
        }
    }
    if stats.outside > 0 {
        warn!(outside = stats.outside, "soundings fell outside the grid");
    }
    grid.materialize_all();
    stats
}
