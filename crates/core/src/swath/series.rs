//! Asynchronous (time-tagged) navigation and attitude streams

use serde::{Deserialize, Serialize};

/// A time-tagged scalar series, sorted by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    time: Vec<f64>,
    value: Vec<f64>,
}

impl TimeSeries {
    /// Build from `(time, value)` pairs. Pairs are sorted by time.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        let mut sorted = pairs.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            time: sorted.iter().map(|p| p.0).collect(),
            value: sorted.iter().map(|p| p.1).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Linear interpolation at `t`, holding the end values outside the series.
    pub fn interpolate(&self, t: f64) -> Option<f64> {
        self.bracket(t).map(|(i, f)| match f {
            None => self.value[i],
            Some(f) => self.value[i] + f * (self.value[i + 1] - self.value[i]),
        })
    }

    /// Like [`interpolate`](Self::interpolate) for headings in degrees,
    /// taking the short way around north. Result is in [0, 360).
    pub fn interpolate_heading(&self, t: f64) -> Option<f64> {
        self.bracket(t).map(|(i, f)| {
            let h = match f {
                None => self.value[i],
                Some(f) => {
                    let mut dh = self.value[i + 1] - self.value[i];
                    if dh > 180.0 {
                        dh -= 360.0;
                    } else if dh < -180.0 {
                        dh += 360.0;
                    }
                    self.value[i] + f * dh
                }
            };
            h.rem_euclid(360.0)
        })
    }

    /// Index of the lower sample and the fraction towards the next one.
    /// The fraction is `None` when `t` is clamped to an end sample.
    fn bracket(&self, t: f64) -> Option<(usize, Option<f64>)> {
        let n = self.time.len();
        if n == 0 {
            return None;
        }
        if n == 1 || t <= self.time[0] {
            return Some((0, None));
        }
        if t >= self.time[n - 1] {
            return Some((n - 1, None));
        }
        let upper = self.time.partition_point(|&x| x <= t);
        let lower = upper - 1;
        let span = self.time[upper] - self.time[lower];
        if span <= 0.0 {
            return Some((lower, None));
        }
        Some((lower, Some((t - self.time[lower]) / span)))
    }
}

/// Per-file asynchronous streams, sampled faster or slower than pings.
///
/// Only consulted when a non-zero time lag is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AsyncStreams {
    pub heading: TimeSeries,
    pub sensor_depth: TimeSeries,
    pub roll: TimeSeries,
    pub pitch: TimeSeries,
}

impl AsyncStreams {
    /// Attitude stream from `(time, roll, pitch)` triples.
    pub fn set_attitude(&mut self, samples: &[(f64, f64, f64)]) {
        let roll: Vec<(f64, f64)> = samples.iter().map(|s| (s.0, s.1)).collect();
        let pitch: Vec<(f64, f64)> = samples.iter().map(|s| (s.0, s.2)).collect();
        self.roll = TimeSeries::from_pairs(&roll);
        self.pitch = TimeSeries::from_pairs(&pitch);
    }
}
