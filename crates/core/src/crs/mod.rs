//! Map projection and geographic extents

mod utm;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned geographic extent in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl GeoBounds {
    /// Zero-area extent at a single point
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            lon_min: lon,
            lon_max: lon,
            lat_min: lat,
            lat_max: lat,
        }
    }

    pub fn include(&mut self, lon: f64, lat: f64) {
        self.lon_min = self.lon_min.min(lon);
        self.lon_max = self.lon_max.max(lon);
        self.lat_min = self.lat_min.min(lat);
        self.lat_max = self.lat_max.max(lat);
    }

    pub fn merge(&mut self, other: &GeoBounds) {
        self.include(other.lon_min, other.lat_min);
        self.include(other.lon_max, other.lat_max);
    }

    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.lon_min + self.lon_max),
            0.5 * (self.lat_min + self.lat_max),
        )
    }

    /// True when either side has no extent or a bound is not finite.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.lon_min.is_finite()
            && self.lon_max.is_finite()
            && self.lat_min.is_finite()
            && self.lat_max.is_finite();
        !finite || self.lon_max <= self.lon_min || self.lat_max <= self.lat_min
    }

    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.lon_min, self.lat_min),
            (self.lon_min, self.lat_max),
            (self.lon_max, self.lat_min),
            (self.lon_max, self.lat_max),
        ]
    }
}

/// Projected extent in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ProjectedBounds {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// A UTM zone projection on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Projection {
    zone: u32,
    north: bool,
}

impl Projection {
    pub fn utm(zone: u32, north: bool) -> Result<Self> {
        if !(1..=60).contains(&zone) {
            return Err(Error::bad_parameter("zone", zone, "UTM zone must be in 1..=60"));
        }
        Ok(Self { zone, north })
    }

    /// UTM zone containing a reference point, hemisphere from its latitude.
    pub fn for_reference(lon: f64, lat: f64) -> Result<Self> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(Error::bad_parameter(
                "reference",
                format!("({lon}, {lat})"),
                "reference position must be finite",
            ));
        }
        let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
        let zone = ((lon + 183.0) / 6.0 + 0.5) as u32;
        Self::utm(zone, lat >= 0.0)
    }

    pub fn zone(&self) -> u32 {
        self.zone
    }

    pub fn is_north(&self) -> bool {
        self.north
    }

    /// Projection identifier such as `UTM10N`
    pub fn id(&self) -> String {
        format!("UTM{:02}{}", self.zone, if self.north { 'N' } else { 'S' })
    }

    /// Matching EPSG code (326xx north, 327xx south)
    pub fn epsg(&self) -> u32 {
        if self.north {
            32600 + self.zone
        } else {
            32700 + self.zone
        }
    }

    /// (lon, lat) in degrees to (easting, northing) in metres
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        utm::wgs84_to_utm(lon, lat, self.zone, self.north)
    }

    /// (easting, northing) in metres to (lon, lat) in degrees
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        utm::utm_to_wgs84(easting, northing, self.zone, self.north)
    }

    /// Envelope of the four projected corners of a geographic extent.
    pub fn project_bounds(&self, bounds: &GeoBounds) -> ProjectedBounds {
        let mut out = ProjectedBounds {
            x_min: f64::MAX,
            x_max: f64::MIN,
            y_min: f64::MAX,
            y_max: f64::MIN,
        };
        for (lon, lat) in bounds.corners() {
            let (x, y) = self.forward(lon, lat);
            out.x_min = out.x_min.min(x);
            out.x_max = out.x_max.max(x);
            out.y_min = out.y_min.min(y);
            out.y_max = out.y_max.max(y);
        }
        out
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Degrees per metre of (longitude, latitude) at a latitude in degrees.
///
/// Local flat-earth scale used to move a sounding by metric offsets from
/// its ping's navigation fix.
pub fn degrees_per_meter(lat: f64) -> (f64, f64) {
    const C1: f64 = 111_412.84;
    const C2: f64 = -93.5;
    const C3: f64 = 0.118;
    const C4: f64 = 111_132.92;
    const C5: f64 = -559.82;
    const C6: f64 = 1.175;
    const C7: f64 = 0.0023;

    let phi = lat.to_radians();
    let per_lon = C1 * phi.cos() + C2 * (3.0 * phi).cos() + C3 * (5.0 * phi).cos();
    let per_lat =
        C4 + C5 * (2.0 * phi).cos() + C6 * (4.0 * phi).cos() + C7 * (6.0 * phi).cos();
    (1.0 / per_lon.abs(), 1.0 / per_lat.abs())
}
