//! Loaded swath files

use super::flag::BeamFlag;
use super::ping::{Beam, Ping};
use super::series::AsyncStreams;
use super::SoundingId;
use crate::crs::GeoBounds;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Kind of sounder a file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopographyType {
    #[default]
    Multibeam,
    Echosounder,
    Other,
}

/// A swath data file held in memory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwathFile {
    pub name: String,
    pub topography: TopographyType,
    /// Transmit beamwidth in degrees
    pub beamwidth_across: f64,
    /// Receive beamwidth in degrees
    pub beamwidth_along: f64,
    pub pings: Vec<Ping>,
    pub streams: AsyncStreams,
}

/// Extent and depth statistics of one file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileExtent {
    pub bounds: GeoBounds,
    /// Deepest usable raw depth, 0 if none
    pub depth_max: f64,
    /// Largest sensor altitude, 0 if none
    pub altitude_max: f64,
}

impl SwathFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            beamwidth_across: 1.0,
            beamwidth_along: 1.0,
            ..Default::default()
        }
    }

    pub fn beam(&self, ping: usize, beam: usize) -> Option<&Beam> {
        self.pings.get(ping).and_then(|p| p.beams.get(beam))
    }

    pub fn beam_mut(&mut self, ping: usize, beam: usize) -> Option<&mut Beam> {
        self.pings.get_mut(ping).and_then(|p| p.beams.get_mut(beam))
    }

    /// Like [`beam`](Self::beam) but reports a bad handle as an error.
    pub fn beam_at(&self, id: SoundingId) -> Result<&Beam> {
        self.beam(id.ping, id.beam).ok_or(Error::InvalidSounding {
            file: id.file,
            ping: id.ping,
            beam: id.beam,
        })
    }

    pub fn sounding_count(&self) -> usize {
        self.pings.iter().map(Ping::beam_count).sum()
    }

    /// Mark beams with non-finite raw geometry as null.
    ///
    /// Returns how many beams were nulled.
    pub fn null_non_finite(&mut self) -> usize {
        let mut count = 0;
        for ping in &mut self.pings {
            for beam in &mut ping.beams {
                if beam.flag.is_usable() && beam.has_non_finite() {
                    beam.flag = BeamFlag::Null;
                    beam.original_flag = BeamFlag::Null;
                    count += 1;
                }
            }
        }
        count
    }

    /// Clear every derived coordinate; called before re-projection.
    pub fn clear_corrections(&mut self) {
        for ping in &mut self.pings {
            ping.nav_xy = None;
            for beam in &mut ping.beams {
                beam.corrected = None;
            }
        }
    }

    /// Geographic extent of navigation and corrected soundings, with
    /// raw depth and altitude maxima.
    ///
    /// Returns `None` for a file without pings.
    pub fn extent(&self) -> Option<FileExtent> {
        let mut bounds: Option<GeoBounds> = None;
        let mut depth_max = 0.0_f64;
        let mut altitude_max = 0.0_f64;
        for ping in &self.pings {
            let b = bounds.get_or_insert(GeoBounds::point(ping.longitude, ping.latitude));
            b.include(ping.longitude, ping.latitude);
            altitude_max = altitude_max.max(ping.altitude);
            for beam in ping.beams.iter().filter(|b| b.flag.is_usable()) {
                depth_max = depth_max.max(beam.depth);
                if let Some(c) = beam.corrected {
                    b.include(c.longitude, c.latitude);
                }
            }
        }
        bounds.map(|bounds| FileExtent {
            bounds,
            depth_max,
            altitude_max,
        })
    }
}
