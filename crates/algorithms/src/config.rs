//! Session configuration

use crate::voxel::VoxelParams;
use serde::{Deserialize, Serialize};
use swathgrid_core::raster::GridAlgorithm;
use swathgrid_core::swath::BiasParameters;

/// Settings of an editing session.
///
/// Every field has a default, so a partial JSON document is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Gridding algorithm (default: footprint)
    pub algorithm: GridAlgorithm,
    /// Grid cell size in metres; `None` derives it from altitude or depth
    pub cell_size: Option<f64>,
    /// Gap tolerance for display interpolation, in cells
    pub interpolation_gap: u32,
    pub voxel: VoxelParams,
    /// Bias parameters applied when the first grid is built
    pub bias: BiasParameters,
    /// Soundings between progress messages in long passes
    pub progress_interval: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            algorithm: GridAlgorithm::default(),
            cell_size: None,
            interpolation_gap: 0,
            voxel: VoxelParams::default(),
            bias: BiasParameters::default(),
            progress_interval: 100_000,
        }
    }
}
