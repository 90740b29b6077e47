//! Per-beam accept/reject flags

use serde::{Deserialize, Serialize};

/// Why a beam was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    /// Rejected interactively by an editor
    Manual,
    /// Rejected by an automatic filter
    Filter,
    /// Rejected by a secondary automatic filter
    Filter2,
    /// Rejected by the sonar's own quality check
    Sonar,
}

/// Accept/reject state of a single beam.
///
/// `Null` beams carry no usable sounding at all; they are never gridded,
/// selected or corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamFlag {
    #[default]
    Accepted,
    Flagged(FlagReason),
    Null,
}

impl BeamFlag {
    /// Flag applied by interactive and voxel edits.
    pub const MANUAL: BeamFlag = BeamFlag::Flagged(FlagReason::Manual);

    /// Beam contributes to the grid.
    pub fn is_ok(self) -> bool {
        matches!(self, BeamFlag::Accepted)
    }

    /// Beam holds a sounding, accepted or not.
    pub fn is_usable(self) -> bool {
        !matches!(self, BeamFlag::Null)
    }

    /// Beam holds a sounding that has been rejected.
    pub fn is_flagged(self) -> bool {
        matches!(self, BeamFlag::Flagged(_))
    }
}
