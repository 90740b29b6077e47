//! Sensor bias parameters

use serde::{Deserialize, Serialize};

/// Corrections applied on top of recorded attitude and timing.
///
/// Angles in degrees, `time_lag` in seconds, `snell` a sound-speed ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasParameters {
    pub roll: f64,
    pub pitch: f64,
    pub heading: f64,
    pub time_lag: f64,
    pub snell: f64,
}

impl Default for BiasParameters {
    fn default() -> Self {
        Self {
            roll: 0.0,
            pitch: 0.0,
            heading: 0.0,
            time_lag: 0.0,
            snell: 1.0,
        }
    }
}

impl BiasParameters {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}
