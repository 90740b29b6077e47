//! Swath bathymetry data model: files, pings, beams and flags

mod bias;
mod file;
mod flag;
mod ping;
mod series;

pub use bias::BiasParameters;
pub use file::{FileExtent, SwathFile, TopographyType};
pub use flag::{BeamFlag, FlagReason};
pub use ping::{Beam, CorrectedSounding, Ping};
pub use series::{AsyncStreams, TimeSeries};

use serde::{Deserialize, Serialize};

/// Stable handle of one sounding: file slot, ping and beam index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SoundingId {
    pub file: usize,
    pub ping: usize,
    pub beam: usize,
}

impl SoundingId {
    pub fn new(file: usize, ping: usize, beam: usize) -> Self {
        Self { file, ping, beam }
    }
}
