//! Pings and beams

use super::flag::BeamFlag;
use serde::{Deserialize, Serialize};

/// Corrected position of a sounding.
///
/// Depth is positive down, referenced to the sea surface. `xy` holds the
/// projected (easting, northing) once a projection has been chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrectedSounding {
    pub longitude: f64,
    pub latitude: f64,
    pub depth: f64,
    pub xy: Option<(f64, f64)>,
}

/// One beam of a swath ping.
///
/// `depth` is the raw depth below the sea surface (sensor depth included),
/// `across_track` is positive to starboard and `along_track` positive
/// forward, both in meters in the vessel frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub depth: f64,
    pub across_track: f64,
    pub along_track: f64,
    pub amplitude: f64,
    pub flag: BeamFlag,
    /// Flag as loaded, before any edit.
    pub original_flag: BeamFlag,
    /// Filled once the owning file has been corrected and projected.
    pub corrected: Option<CorrectedSounding>,
}

impl Beam {
    /// Accepted beam without amplitude.
    pub fn new(depth: f64, across_track: f64, along_track: f64) -> Self {
        Self::with_flag(depth, across_track, along_track, BeamFlag::Accepted)
    }

    pub fn with_flag(depth: f64, across_track: f64, along_track: f64, flag: BeamFlag) -> Self {
        Self {
            depth,
            across_track,
            along_track,
            amplitude: 0.0,
            flag,
            original_flag: flag,
            corrected: None,
        }
    }

    /// True when any raw geometry field is not finite.
    pub fn has_non_finite(&self) -> bool {
        !(self.depth.is_finite() && self.across_track.is_finite() && self.along_track.is_finite())
    }
}

/// One swath ping with its navigation, attitude and beams.
///
/// Angles are in degrees, `time` in epoch seconds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ping {
    pub time: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub heading: f64,
    pub speed: f64,
    pub sensor_depth: f64,
    pub altitude: f64,
    pub roll: f64,
    pub pitch: f64,
    pub heave: f64,
    pub beams: Vec<Beam>,
    /// Projected navigation position, set when the file is projected.
    pub nav_xy: Option<(f64, f64)>,
}

impl Ping {
    pub fn beam_count(&self) -> usize {
        self.beams.len()
    }

    pub fn accepted_beams(&self) -> impl Iterator<Item = (usize, &Beam)> {
        self.beams.iter().enumerate().filter(|(_, b)| b.flag.is_ok())
    }
}
