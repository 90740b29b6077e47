//! Bias correction of swath soundings
//!
//! Turns a beam's raw (depth, across-track, along-track) into a corrected
//! geographic position and depth under a set of [`BiasParameters`]:
//!
//! 1. Attitude at `ping.time + time_lag`, composed with the bias
//!    ([`solve_attitude`]).
//! 2. Optional sound-speed re-steering ([`snell_correction`]).
//! 3. Rotation into (east, north, down) and sensor depth added back.
//! 4. Metric offsets converted to degrees at the ping's latitude.

mod attitude;
mod snell;

pub use attitude::{rotate_beam, solve_attitude, AttitudeSolution};
pub use snell::snell_correction;

use swathgrid_core::crs::{degrees_per_meter, Projection};
use swathgrid_core::swath::{Beam, BiasParameters, CorrectedSounding, Ping, SwathFile};
use swathgrid_core::{Error, Result};
use tracing::warn;

/// Per-ping state shared by all of its beams.
#[derive(Debug, Clone, Copy)]
pub struct PingCorrector {
    longitude: f64,
    latitude: f64,
    deg_per_m: (f64, f64),
    recorded_roll: f64,
    recorded_sensor_depth: f64,
    snell: f64,
    attitude: AttitudeSolution,
}

impl PingCorrector {
    pub fn new(file: &SwathFile, ping: &Ping, bias: &BiasParameters) -> Self {
        Self {
            longitude: ping.longitude,
            latitude: ping.latitude,
            deg_per_m: degrees_per_meter(ping.latitude),
            recorded_roll: ping.roll,
            recorded_sensor_depth: ping.sensor_depth,
            snell: bias.snell,
            attitude: solve_attitude(file, ping, bias),
        }
    }

    pub fn attitude(&self) -> &AttitudeSolution {
        &self.attitude
    }

    /// Corrected geographic position and depth of one beam.
    ///
    /// Fails with [`Error::NumericAnomaly`] when an input or output is not
    /// finite.
    pub fn correct(&self, beam: &Beam) -> Result<CorrectedSounding> {
        let z = beam.depth - self.recorded_sensor_depth;
        let (mut across, mut along, mut z) = (beam.across_track, beam.along_track, z);
        if !(across.is_finite() && along.is_finite() && z.is_finite()) {
            return Err(Error::NumericAnomaly {
                context: format!("raw beam ({across}, {along}, {z})"),
            });
        }

        if self.snell != 1.0 {
            let roll = self.recorded_roll + self.attitude.roll_delta;
            (across, along, z) = snell_correction(self.snell, roll, across, along, z);
            if !(across.is_finite() && along.is_finite() && z.is_finite()) {
                return Err(Error::NumericAnomaly {
                    context: format!(
                        "snell correction ratio {} roll {roll}: ({across}, {along}, {z})",
                        self.snell
                    ),
                });
            }
        }

        let a = &self.attitude;
        let (east, north, down) = rotate_beam(across, along, z, a.roll_delta, a.pitch_delta, a.heading);
        let sounding = CorrectedSounding {
            longitude: self.longitude + self.deg_per_m.0 * east,
            latitude: self.latitude + self.deg_per_m.1 * north,
            depth: down + a.sensor_depth,
            xy: None,
        };
        if !(sounding.longitude.is_finite()
            && sounding.latitude.is_finite()
            && sounding.depth.is_finite())
        {
            return Err(Error::NumericAnomaly {
                context: format!(
                    "corrected position ({}, {}) depth {}",
                    sounding.longitude, sounding.latitude, sounding.depth
                ),
            });
        }
        Ok(sounding)
    }
}

/// Recompute the corrected geographic position of every usable beam.
///
/// Projected coordinates are cleared. Beams that fail are left without a
/// correction and logged; the number of failures is returned.
pub fn correct_file(file: &mut SwathFile, file_index: usize, bias: &BiasParameters) -> usize {
    let mut anomalies = 0;
    for ping_index in 0..file.pings.len() {
        let corrector = PingCorrector::new(file, &file.pings[ping_index], bias);
        let ping = &mut file.pings[ping_index];
        ping.nav_xy = None;
        for (beam_index, beam) in ping.beams.iter_mut().enumerate() {
            beam.corrected = None;
            if !beam.flag.is_usable() {
                continue;
            }
            match corrector.correct(beam) {
                Ok(sounding) => beam.corrected = Some(sounding),
                Err(e) => {
                    anomalies += 1;
                    warn!(
                        file = file_index,
                        ping = ping_index,
                        beam = beam_index,
                        depth = beam.depth,
                        across = beam.across_track,
                        along = beam.along_track,
                        "skipping beam: {e}"
                    );
                }
            }
        }
    }
    anomalies
}

/// Project navigation and corrected soundings of a file.
pub fn project_file(file: &mut SwathFile, projection: &Projection) {
    for ping in &mut file.pings {
        ping.nav_xy = Some(projection.forward(ping.longitude, ping.latitude));
        for beam in &mut ping.beams {
            if let Some(c) = beam.corrected.as_mut() {
                c.xy = Some(projection.forward(c.longitude, c.latitude));
            }
        }
    }
}
