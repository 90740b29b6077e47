//! Gaussian beam footprint model
//!
//! A beam's insonified area is modelled as an elliptical Gaussian
//!
//! ```text
//! w(x, y) = 1 / (pi a b) * exp(-(x^2 / a^2 + y^2 / b^2))
//! ```
//!
//! in footprint coordinates: x along the horizontal projection of the beam
//! (away from nadir), y perpendicular to it. The weight a grid cell receives
//! is the integral of `w` over the cell, approximated by an axis-aligned
//! rectangle of the same size centered on the rotated cell center.

use swathgrid_core::raster::GridGeometry;

/// Semi-axes below this are raised to it, in metres.
const MIN_SEMI_AXIS: f64 = 1e-3;

/// Integrated weight above which a cell is always used.
const STRONG_WEIGHT: f64 = 0.05;

/// Whether a beam's footprint reaches a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FootprintUse {
    No,
    Conditional,
    Yes,
}

/// Error function, Chebyshev fit of erfc with fractional error below 1.2e-7
/// (Numerical Recipes `erfcc`).
pub fn erf(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -1.26551223
        + t * (1.00002368
            + t * (0.37409196
                + t * (0.09678418
                    + t * (-0.18628806
                        + t * (0.27886807
                            + t * (-1.13520398
                                + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277))))))));
    let erfc = t * (-z * z + poly).exp();
    let erfc = if x >= 0.0 { erfc } else { 2.0 - erfc };
    1.0 - erfc
}

/// Elliptical footprint of one beam on the grid plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Semi-axis across the beam direction's horizontal projection (m)
    pub half_width: f64,
    /// Semi-axis perpendicular to it (m)
    pub half_length: f64,
    /// Unit vector from nadir towards the sounding, (east, north)
    pub direction: (f64, f64),
    /// Incidence angle from vertical, degrees
    pub incidence: f64,
}

/// Beam geometry needed to size a footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamGeometry {
    /// Projected sounding position
    pub sounding_xy: (f64, f64),
    /// Projected navigation position of the ping
    pub nav_xy: (f64, f64),
    /// Corrected depth (positive down)
    pub depth: f64,
    pub sensor_depth: f64,
    pub altitude: f64,
    /// File beamwidths in degrees
    pub beamwidth_across: f64,
    pub beamwidth_along: f64,
}

impl Footprint {
    pub fn from_beam(beam: &BeamGeometry) -> Self {
        let dx = beam.sounding_xy.0 - beam.nav_xy.0;
        let dy = beam.sounding_xy.1 - beam.nav_xy.1;
        let lateral = (dx * dx + dy * dy).sqrt();
        let direction = if lateral > 0.0 {
            (dx / lateral, dy / lateral)
        } else {
            (1.0, 0.0)
        };
        let range = (lateral * lateral + beam.altitude * beam.altitude).sqrt();
        let below_sensor = beam.depth - beam.sensor_depth;
        let theta = lateral.atan2(below_sensor).to_degrees();

        let mut dtheta = 0.5 * beam.beamwidth_across;
        let mut dphi = 0.5 * beam.beamwidth_along;
        if dtheta <= 0.0 {
            dtheta = 1.0;
        }
        if dphi <= 0.0 {
            dphi = 1.0;
        }

        let half_width = below_sensor * (theta + dtheta).to_radians().tan() - lateral;
        let half_length = range * dphi.to_radians().tan();
        Self {
            half_width: half_width.abs().max(MIN_SEMI_AXIS),
            half_length: half_length.abs().max(MIN_SEMI_AXIS),
            direction,
            incidence: theta,
        }
    }

    /// Rotate a grid-plane offset (east, north) into footprint coordinates.
    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        let (dxn, dyn_) = self.direction;
        (x * dxn + y * dyn_, -x * dyn_ + y * dxn)
    }

    /// Cell-index radius (cols, rows) that can hold a footprint weight.
    pub fn search_radius(&self, dx: f64, dy: f64) -> (usize, usize) {
        let (s, c) = self.incidence.to_radians().sin_cos();
        let wix = (self.half_width * c / dx).abs();
        let wiy = (self.half_width * s / dx).abs();
        let lix = (self.half_length * s / dy).abs();
        let liy = (self.half_length * c / dy).abs();
        ((2.0 * wix.max(lix)) as usize, (2.0 * wiy.max(liy)) as usize)
    }

    /// Integrated weight of a cell whose center lies at `center` (footprint
    /// coordinates) with half extents `half`, and the usage decision.
    ///
    /// `corners` are the four rotated cell corners.
    pub fn bin_weight(
        &self,
        center: (f64, f64),
        half: (f64, f64),
        corners: &[(f64, f64); 4],
    ) -> (f64, FootprintUse) {
        let (a, b) = (self.half_width, self.half_length);
        let (pcx, pcy) = center;
        let weight = 0.25
            * (erf((pcx + half.0) / a) - erf((pcx - half.0) / a))
            * (erf((pcy + half.1) / b) - erf((pcy - half.1) / b));

        if weight > STRONG_WEIGHT {
            return (weight, FootprintUse::Yes);
        }
        let usage = corners
            .iter()
            .map(|&(px, py)| {
                let ang = py.atan2(px);
                let xe = a * ang.cos();
                let ye = b * ang.sin();
                let ratio = ((px * px + py * py) / (xe * xe + ye * ye)).sqrt();
                if ratio <= 1.0 {
                    FootprintUse::Yes
                } else if ratio <= 2.0 {
                    FootprintUse::Conditional
                } else {
                    FootprintUse::No
                }
            })
            .max()
            .unwrap_or(FootprintUse::No);
        (weight, usage)
    }

    /// Weights of every cell the footprint reaches, as `(row, col, weight)`.
    ///
    /// `center` is the (row, col) of the cell holding the sounding.
    pub fn cell_weights(
        &self,
        geometry: &GridGeometry,
        sounding_xy: (f64, f64),
        center: (usize, usize),
    ) -> Vec<(usize, usize, f64)> {
        let (rcol, rrow) = self.search_radius(geometry.dx, geometry.dy);
        let (row0, col0) = center;
        let rows = row0.saturating_sub(rrow)..=(row0 + rrow).min(geometry.n_rows.saturating_sub(1));
        let cols = col0.saturating_sub(rcol)..=(col0 + rcol).min(geometry.n_cols.saturating_sub(1));
        let half = (0.5 * geometry.dx, 0.5 * geometry.dy);

        let mut out = Vec::new();
        for row in rows {
            for col in cols.clone() {
                let (cx, cy) = geometry.cell_center(row, col);
                let x0 = cx - sounding_xy.0;
                let y0 = cy - sounding_xy.1;
                let corners = [
                    self.to_local(x0 - half.0, y0 - half.1),
                    self.to_local(x0 + half.0, y0 - half.1),
                    self.to_local(x0 - half.0, y0 + half.1),
                    self.to_local(x0 + half.0, y0 + half.1),
                ];
                let (weight, usage) = self.bin_weight(self.to_local(x0, y0), half, &corners);
                if usage == FootprintUse::Yes && weight > 0.0 {
                    out.push((row, col, weight));
                }
            }
        }
        out
    }
}
