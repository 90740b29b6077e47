//! Sounding selection for 3-D inspection, filtering and bias tuning
//!
//! Selected soundings are held in a local frame: origin at the center of
//! the selected area, x along the selection bearing, y to its left, z the
//! depth (positive down) relative to the middle of the selected depths.

use crate::correction::PingCorrector;
use serde::{Deserialize, Serialize};
use swathgrid_core::crs::Projection;
use swathgrid_core::swath::{BeamFlag, BiasParameters, SoundingId, SwathFile};
use swathgrid_core::{Error, Result};

/// What to select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionShape {
    /// Axis-aligned rectangle in projected metres
    Region {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },
    /// Rectangle along the segment `start` to `end`, `width` metres across
    Area {
        start: (f64, f64),
        end: (f64, f64),
        width: f64,
    },
    /// Every sounding of the listed (file, ping) pairs
    Nav { pings: Vec<(usize, usize)> },
}

/// One selected sounding in the local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedSounding {
    pub id: SoundingId,
    pub flag: BeamFlag,
    pub original_flag: BeamFlag,
    pub amplitude: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Local frame of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    pub x_origin: f64,
    pub y_origin: f64,
    /// Compass bearing of the local x axis, degrees
    pub bearing: f64,
}

impl LocalFrame {
    /// Projected (easting, northing) into local (x, y).
    pub fn to_local(&self, easting: f64, northing: f64) -> (f64, f64) {
        let (s, c) = self.bearing.to_radians().sin_cos();
        let x = easting - self.x_origin;
        let y = northing - self.y_origin;
        (x * s + y * c, -x * c + y * s)
    }
}

/// A set of soundings pulled out of the loaded files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub frame: LocalFrame,
    /// Absolute depth of local z = 0
    pub z_origin: f64,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub z_range: (f64, f64),
    /// Ordered by sounding id
    pub soundings: Vec<SelectedSounding>,
    pub unflagged: usize,
    pub flagged: usize,
}

/// A usable beam with its projected position and depth.
struct Candidate {
    id: SoundingId,
    flag: BeamFlag,
    original_flag: BeamFlag,
    amplitude: f64,
    xy: (f64, f64),
    depth: f64,
}

/// Usable, projected beams of one ping.
fn ping_soundings(
    file: &SwathFile,
    file_index: usize,
    ping_index: usize,
) -> impl Iterator<Item = Candidate> + '_ {
    file.pings[ping_index]
        .beams
        .iter()
        .enumerate()
        .filter(|(_, b)| b.flag.is_usable())
        .filter_map(move |(beam_index, b)| {
            let c = b.corrected?;
            Some(Candidate {
                id: SoundingId::new(file_index, ping_index, beam_index),
                flag: b.flag,
                original_flag: b.original_flag,
                amplitude: b.amplitude,
                xy: c.xy?,
                depth: c.depth,
            })
        })
}

impl Selection {
    /// Select usable, projected soundings of the loaded files.
    ///
    /// An empty result is not an error; operations that need soundings
    /// check for it.
    pub fn select(files: &[Option<SwathFile>], shape: &SelectionShape) -> Result<Self> {
        let loaded = || {
            files
                .iter()
                .enumerate()
                .filter_map(|(i, f)| f.as_ref().map(|f| (i, f)))
        };
        let mut raw: Vec<Candidate> = Vec::new();

        let (frame, x_range, y_range) = match shape {
            SelectionShape::Region {
                x_min,
                x_max,
                y_min,
                y_max,
            } => {
                if !(x_max > x_min && y_max > y_min) {
                    return Err(Error::bad_parameter(
                        "region",
                        format!("[{x_min}, {x_max}] x [{y_min}, {y_max}]"),
                        "region has no area",
                    ));
                }
                let frame = LocalFrame {
                    x_origin: 0.5 * (x_min + x_max),
                    y_origin: 0.5 * (y_min + y_max),
                    bearing: 90.0,
                };
                let hx = 0.5 * (x_max - x_min);
                let hy = 0.5 * (y_max - y_min);
                (frame, (-hx, hx), (-hy, hy))
            }
            SelectionShape::Area { start, end, width } => {
                let dx = end.0 - start.0;
                let dy = end.1 - start.1;
                let length = (dx * dx + dy * dy).sqrt();
                if !(length > 0.0 && *width > 0.0) {
                    return Err(Error::bad_parameter(
                        "area",
                        format!("length {length} width {width}"),
                        "area has no extent",
                    ));
                }
                let frame = LocalFrame {
                    x_origin: 0.5 * (start.0 + end.0),
                    y_origin: 0.5 * (start.1 + end.1),
                    bearing: dx.atan2(dy).to_degrees(),
                };
                (frame, (-0.5 * length, 0.5 * length), (-0.5 * width, 0.5 * width))
            }
            SelectionShape::Nav { pings } => {
                for &(file_index, ping_index) in pings {
                    let file = files
                        .get(file_index)
                        .and_then(Option::as_ref)
                        .filter(|f| ping_index < f.pings.len())
                        .ok_or(Error::InvalidSounding {
                            file: file_index,
                            ping: ping_index,
                            beam: 0,
                        })?;
                    raw.extend(ping_soundings(file, file_index, ping_index));
                }
                let (mut x0, mut x1, mut y0, mut y1) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
                for s in &raw {
                    x0 = x0.min(s.xy.0);
                    x1 = x1.max(s.xy.0);
                    y0 = y0.min(s.xy.1);
                    y1 = y1.max(s.xy.1);
                }
                if raw.is_empty() {
                    (x0, x1, y0, y1) = (0.0, 0.0, 0.0, 0.0);
                }
                let frame = LocalFrame {
                    x_origin: 0.5 * (x0 + x1),
                    y_origin: 0.5 * (y0 + y1),
                    bearing: 90.0,
                };
                let hx = 0.5 * (x1 - x0);
                let hy = 0.5 * (y1 - y0);
                (frame, (-hx, hx), (-hy, hy))
            }
        };

        if !matches!(shape, SelectionShape::Nav { .. }) {
            for (file_index, file) in loaded() {
                for ping_index in 0..file.pings.len() {
                    raw.extend(ping_soundings(file, file_index, ping_index).filter(|s| {
                        let (x, y) = frame.to_local(s.xy.0, s.xy.1);
                        x >= x_range.0 && x <= x_range.1 && y >= y_range.0 && y <= y_range.1
                    }));
                }
            }
        }

        let (mut zmin, mut zmax) = (f64::MAX, f64::MIN);
        for s in &raw {
            zmin = zmin.min(s.depth);
            zmax = zmax.max(s.depth);
        }
        let z_origin = if raw.is_empty() { 0.0 } else { 0.5 * (zmin + zmax) };
        let half_z = if raw.is_empty() { 0.0 } else { 0.5 * (zmax - zmin) };

        let mut selection = Selection {
            frame,
            z_origin,
            x_range,
            y_range,
            z_range: (-half_z, half_z),
            soundings: Vec::with_capacity(raw.len()),
            unflagged: 0,
            flagged: 0,
        };
        for c in raw {
            let (x, y) = frame.to_local(c.xy.0, c.xy.1);
            selection.soundings.push(SelectedSounding {
                id: c.id,
                flag: c.flag,
                original_flag: c.original_flag,
                amplitude: c.amplitude,
                x,
                y,
                z: c.depth - z_origin,
            });
        }
        selection.soundings.sort_unstable_by_key(|s| s.id);
        selection.soundings.dedup_by_key(|s| s.id);
        selection.recount();
        Ok(selection)
    }

    pub fn len(&self) -> usize {
        self.soundings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.soundings.is_empty()
    }

    /// Recount flagged and unflagged soundings.
    pub fn recount(&mut self) {
        self.unflagged = self.soundings.iter().filter(|s| s.flag.is_ok()).count();
        self.flagged = self.soundings.len() - self.unflagged;
    }

    /// Update a selected sounding's flag, keeping the counts right.
    pub fn set_flag(&mut self, id: SoundingId, flag: BeamFlag) {
        if let Ok(i) = self.soundings.binary_search_by_key(&id, |s| s.id) {
            let s = &mut self.soundings[i];
            match (s.flag.is_ok(), flag.is_ok()) {
                (true, false) => {
                    self.unflagged -= 1;
                    self.flagged += 1;
                }
                (false, true) => {
                    self.flagged -= 1;
                    self.unflagged += 1;
                }
                _ => {}
            }
            s.flag = flag;
        }
    }

    /// Local (x, y, z) of every selected sounding under `bias`, recomputed
    /// from the raw beams without touching the files.
    ///
    /// Soundings whose correction fails are `None`.
    pub fn relocate(
        &self,
        files: &[Option<SwathFile>],
        bias: &BiasParameters,
        projection: &Projection,
    ) -> Vec<Option<(f64, f64, f64)>> {
        let mut cached: Option<((usize, usize), PingCorrector)> = None;
        self.soundings
            .iter()
            .map(|s| {
                let file = files.get(s.id.file)?.as_ref()?;
                let ping = file.pings.get(s.id.ping)?;
                let beam = ping.beams.get(s.id.beam)?;
                let key = (s.id.file, s.id.ping);
                let corrector = match cached {
                    Some((k, c)) if k == key => c,
                    _ => {
                        let c = PingCorrector::new(file, ping, bias);
                        cached = Some((key, c));
                        c
                    }
                };
                let c = corrector.correct(beam).ok()?;
                let (e, n) = projection.forward(c.longitude, c.latitude);
                let (x, y) = self.frame.to_local(e, n);
                Some((x, y, c.depth - self.z_origin))
            })
            .collect()
    }

    /// Replace local coordinates with relocated ones, keeping soundings
    /// that could not be relocated where they were.
    pub fn apply_positions(&mut self, positions: &[Option<(f64, f64, f64)>]) {
        for (s, p) in self.soundings.iter_mut().zip(positions) {
            if let Some((x, y, z)) = *p {
                s.x = x;
                s.y = y;
                s.z = z;
            }
        }
    }
}
