//! # swathgrid algorithms
//!
//! Correction, gridding and quality-control passes over swath soundings.
//!
//! ## Modules
//!
//! - **correction**: roll/pitch/heading bias, time lag and Snell re-steering
//! - **footprint**: Gaussian beam footprints and their cell weights
//! - **gridding**: simple-mean, footprint and shoal-bias accumulation
//! - **selection**: soundings pulled into a local frame for inspection
//! - **voxel**: sparse-voxel outlier flagging
//! - **optimizer**: bias search by depth-variance minimization
//! - **session**: the editing context tying files, grid and edits together

pub mod config;
pub mod correction;
pub mod edit;
pub mod footprint;
pub mod gridding;
pub mod observer;
pub mod optimizer;
pub mod selection;
pub mod session;
pub mod voxel;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::correction::{correct_file, project_file, PingCorrector};
    pub use crate::edit::{EditAction, EditEvent, FlushMode, OutstandingEdit};
    pub use crate::footprint::{Footprint, FootprintUse};
    pub use crate::gridding::{GridStats, SurveyExtent};
    pub use crate::observer::{NullObserver, SessionObserver};
    pub use crate::optimizer::{optimize, BiasParameter, OptimizerResult, ParameterMask};
    pub use crate::selection::{SelectedSounding, Selection, SelectionShape};
    pub use crate::session::Session;
    pub use crate::voxel::{find_sparse, VoxelParams, VoxelReport};
    pub use swathgrid_core::prelude::*;
}
