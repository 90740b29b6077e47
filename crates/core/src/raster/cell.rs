//! Running depth accumulators of one grid cell

use serde::{Deserialize, Serialize};

/// Weights below this are treated as an empty cell.
pub const WEIGHT_TINY: f64 = 1e-7;

/// Weighted sums of depth and squared depth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridCell {
    pub sum: f64,
    pub weight: f64,
    pub sum2: f64,
}

impl GridCell {
    pub fn add(&mut self, weight: f64, depth: f64) {
        self.weight += weight;
        self.sum += weight * depth;
        self.sum2 += weight * depth * depth;
        self.clamp_tiny();
    }

    pub fn remove(&mut self, weight: f64, depth: f64) {
        self.weight -= weight;
        self.sum -= weight * depth;
        self.sum2 -= weight * depth * depth;
        self.clamp_tiny();
    }

    /// Keep the shallowest depth seen (depth is positive down).
    pub fn keep_shoalest(&mut self, depth: f64) {
        if self.is_empty() || depth < self.sum / self.weight {
            self.weight = 1.0;
            self.sum = depth;
            self.sum2 = depth * depth;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weight <= 0.0
    }

    /// Mean depth and standard deviation, `None` for an empty cell.
    pub fn materialize(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let value = self.sum / self.weight;
        let stddev = (self.sum2 / self.weight - value * value).abs().sqrt();
        Some((value, stddev))
    }

    fn clamp_tiny(&mut self) {
        if self.weight < WEIGHT_TINY {
            *self = Self::default();
        }
    }
}
