//! Synthetic surveys shared by the integration tests.

#![allow(dead_code)]

use nalgebra::{Rotation3, Vector3};
use std::f64::consts::PI;
use swathgrid_core::crs::degrees_per_meter;
use swathgrid_core::swath::{Beam, Ping, SwathFile, TimeSeries};

pub const LON: f64 = -122.0;
pub const LAT: f64 = 36.8;
pub const DEPTH: f64 = 100.0;

/// Straight line over a flat seafloor `DEPTH` metres down.
///
/// Pings run north (`heading` 0) or south (`heading` 180) through the same
/// positions, `spacing` metres apart, with 21 beams between -60 and +60
/// degrees. Beam vectors are recorded through a roll error of
/// `roll_error` degrees, so a roll bias of `roll_error` recovers the
/// seafloor.
pub fn flat_line(name: &str, heading: f64, pings: usize, spacing: f64, roll_error: f64) -> SwathFile {
    sloping_line(name, heading, pings, spacing, (roll_error, 0.0), 0.0)
}

/// Like [`flat_line`] over a seafloor deepening northward by `slope` metres
/// per metre, recorded through `(roll, pitch)` errors in degrees.
pub fn sloping_line(
    name: &str,
    heading: f64,
    pings: usize,
    spacing: f64,
    (roll_error, pitch_error): (f64, f64),
    slope: f64,
) -> SwathFile {
    let (_, dlat) = degrees_per_meter(LAT);
    let error = Rotation3::from_euler_angles(roll_error.to_radians(), pitch_error.to_radians(), 0.0).inverse();
    let mut file = SwathFile::new(name);
    for i in 0..pings {
        let k = if heading == 0.0 { i } else { pings - 1 - i };
        let north = k as f64 * spacing;
        let depth = DEPTH + slope * north;
        let beams = (0..21)
            .map(|b| {
                let angle = (-60.0 + 6.0 * b as f64).to_radians();
                let truth = Vector3::new(0.0, depth * angle.tan(), depth);
                let recorded = error * truth;
                Beam::new(recorded.z, recorded.y, recorded.x)
            })
            .collect();
        file.pings.push(Ping {
            time: 1.0e9 + i as f64,
            longitude: LON,
            latitude: LAT + north * dlat,
            heading,
            speed: 2.0,
            altitude: depth,
            beams,
            ..Default::default()
        });
    }
    file
}

/// Northbound line over a flat seafloor, one ping a second, whose roll
/// `3 sin(2 pi t / 10)` degrees went unapplied by the sonar.
///
/// The roll stream is stamped `lag` seconds late, so a time-lag bias of
/// `lag` recovers the seafloor.
pub fn rolling_line(name: &str, pings: usize, spacing: f64, lag: f64) -> SwathFile {
    let (_, dlat) = degrees_per_meter(LAT);
    let roll_at = |t: f64| 3.0 * (2.0 * PI * t / 10.0).sin();
    let t0 = 1000.0;
    let mut file = SwathFile::new(name);
    for i in 0..pings {
        let t = t0 + i as f64;
        let error = Rotation3::from_euler_angles(roll_at(t).to_radians(), 0.0, 0.0).inverse();
        let beams = (0..21)
            .map(|b| {
                let angle = (-60.0 + 6.0 * b as f64).to_radians();
                let truth = Vector3::new(0.0, DEPTH * angle.tan(), DEPTH);
                let recorded = error * truth;
                Beam::new(recorded.z, recorded.y, recorded.x)
            })
            .collect();
        file.pings.push(Ping {
            time: t,
            longitude: LON,
            latitude: LAT + i as f64 * spacing * dlat,
            heading: 0.0,
            speed: 2.0,
            altitude: DEPTH,
            beams,
            ..Default::default()
        });
    }
    let samples: Vec<(f64, f64)> = (0..(pings as i64 + 20) * 10)
        .map(|j| {
            let stamp = t0 - 10.0 + j as f64 * 0.1;
            (stamp, roll_at(stamp - lag))
        })
        .collect();
    file.streams.roll = TimeSeries::from_pairs(&samples);
    file
}

/// Route library logs to the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Every (file, ping) pair of the given files.
pub fn all_pings(files: &[&SwathFile]) -> Vec<(usize, usize)> {
    files
        .iter()
        .enumerate()
        .flat_map(|(f, file)| (0..file.pings.len()).map(move |p| (f, p)))
        .collect()
}
