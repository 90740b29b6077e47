//! # swathgrid core
//!
//! Data model and storage types for incremental swath bathymetry gridding.
//!
//! This crate provides:
//! - Sounding model: `SwathFile`, `Ping`, `Beam`, `BeamFlag`, `SoundingId`
//! - `BiasParameters`: roll, pitch, heading, time-lag and sound-speed corrections
//! - `Projection`: UTM forward/inverse on WGS84
//! - `BathymetryGrid`: weighted cell accumulators with materialized depth and stddev

pub mod crs;
pub mod error;
pub mod raster;
pub mod swath;

pub use crs::{GeoBounds, Projection, ProjectedBounds};
pub use error::{Error, Result};
pub use raster::{BathymetryGrid, CellUpdate, GridAlgorithm, GridCell, GridGeometry};
pub use swath::{BeamFlag, BiasParameters, SoundingId, SwathFile};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{GeoBounds, Projection, ProjectedBounds};
    pub use crate::error::{Error, Result};
    pub use crate::raster::{BathymetryGrid, CellUpdate, GridAlgorithm, GridCell, GridGeometry};
    pub use crate::swath::{
        Beam, BeamFlag, BiasParameters, CorrectedSounding, FlagReason, Ping, SoundingId,
        SwathFile, TopographyType,
    };
}
