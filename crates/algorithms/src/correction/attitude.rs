//! Attitude composition and beam rotation
//!
//! Beam vectors are expressed in a vessel frame with x forward (along
//! track), y to starboard (across track) and z down. Rotating by roll,
//! pitch and heading yields (north, east, down).

use nalgebra::{Rotation3, Vector3};
use swathgrid_core::swath::{BiasParameters, Ping, SwathFile, TimeSeries};

/// Net attitude to apply to a ping's recorded beam vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeSolution {
    /// Absolute heading in degrees, bias included
    pub heading: f64,
    /// Sensor depth at the (possibly lagged) ping time
    pub sensor_depth: f64,
    /// Roll to apply on top of what the sonar already applied
    pub roll_delta: f64,
    /// Pitch to apply on top of what the sonar already applied
    pub pitch_delta: f64,
}

/// Rotation for roll, pitch and heading in degrees (Rz * Ry * Rx).
fn rotation(roll: f64, pitch: f64, heading: f64) -> Rotation3<f64> {
    Rotation3::from_euler_angles(roll.to_radians(), pitch.to_radians(), heading.to_radians())
}

/// Compose the recorded attitude, the bias and the navigation attitude.
///
/// Recorded beams already carry the ping's roll and pitch. That rotation is
/// undone, the bias applied in the vessel frame, and the navigation
/// attitude (at `ping.time + time_lag`) applied on top. The result is
/// decomposed back into the deltas relative to the recorded attitude.
pub fn solve_attitude(file: &SwathFile, ping: &Ping, bias: &BiasParameters) -> AttitudeSolution {
    let t = ping.time + bias.time_lag;
    let lagged = bias.time_lag != 0.0;
    let streams = &file.streams;
    let pick = |series: &TimeSeries, fallback: f64| {
        if lagged {
            series.interpolate(t).unwrap_or(fallback)
        } else {
            fallback
        }
    };

    let sensor_depth = pick(&streams.sensor_depth, ping.sensor_depth);
    let heading_nav = if lagged {
        streams.heading.interpolate_heading(t).unwrap_or(ping.heading)
    } else {
        ping.heading
    };
    let roll_nav = pick(&streams.roll, ping.roll);
    let pitch_nav = pick(&streams.pitch, ping.pitch);

    let applied = rotation(ping.roll, ping.pitch, 0.0);
    let bias_rot = rotation(bias.roll, bias.pitch, bias.heading);
    let nav = rotation(roll_nav, pitch_nav, heading_nav);
    let total = nav * bias_rot * applied.inverse();
    let (roll_delta, pitch_delta, heading) = total.euler_angles();

    AttitudeSolution {
        heading: heading.to_degrees().rem_euclid(360.0),
        sensor_depth,
        roll_delta: roll_delta.to_degrees(),
        pitch_delta: pitch_delta.to_degrees(),
    }
}

/// Rotate a beam vector by roll/pitch deltas and heading.
///
/// Returns (east, north, down) offsets in metres from the navigation fix.
pub fn rotate_beam(
    across_track: f64,
    along_track: f64,
    z: f64,
    roll_delta: f64,
    pitch_delta: f64,
    heading: f64,
) -> (f64, f64, f64) {
    let v = rotation(roll_delta, pitch_delta, heading) * Vector3::new(along_track, across_track, z);
    (v.y, v.x, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ping(roll: f64, pitch: f64, heading: f64) -> Ping {
        Ping {
            time: 100.0,
            heading,
            roll,
            pitch,
            sensor_depth: 3.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_identity_bias_leaves_recorded_attitude() {
        let file = SwathFile::new("a");
        let sol = solve_attitude(&file, &ping(4.0, -2.0, 37.0), &BiasParameters::default());
        assert_abs_diff_eq!(sol.roll_delta, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.pitch_delta, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.heading, 37.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.sensor_depth, 3.0);
    }

    #[test]
    fn test_level_ping_bias_passes_through() {
        let file = SwathFile::new("a");
        let bias = BiasParameters {
            roll: 1.5,
            heading: 2.0,
            ..Default::default()
        };
        let sol = solve_attitude(&file, &ping(0.0, 0.0, 359.0), &bias);
        assert_abs_diff_eq!(sol.roll_delta, 1.5, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.pitch_delta, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.heading, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_time_lag_reads_async_streams() {
        let mut file = SwathFile::new("a");
        file.streams.heading = TimeSeries::from_pairs(&[(100.0, 10.0), (102.0, 20.0)]);
        file.streams.sensor_depth = TimeSeries::from_pairs(&[(100.0, 3.0), (102.0, 5.0)]);
        let bias = BiasParameters {
            time_lag: 1.0,
            ..Default::default()
        };
        let sol = solve_attitude(&file, &ping(0.0, 0.0, 10.0), &bias);
        assert_abs_diff_eq!(sol.heading, 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.sensor_depth, 4.0, epsilon = 1e-12);
        // no attitude stream: recorded roll/pitch stay in effect
        assert_abs_diff_eq!(sol.roll_delta, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotate_beam_heading() {
        // starboard of an eastbound vessel is south
        let (e, n, d) = rotate_beam(10.0, 0.0, 50.0, 0.0, 0.0, 90.0);
        assert_abs_diff_eq!(e, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(n, -10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(d, 50.0, epsilon = 1e-9);
        // forward of a northbound vessel is north
        let (e, n, _) = rotate_beam(0.0, 5.0, 50.0, 0.0, 0.0, 0.0);
        assert_abs_diff_eq!(e, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(n, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotate_beam_roll_swings_nadir_to_port() {
        // starboard-down roll tilts the vessel's down axis to port
        let (e, _, d) = rotate_beam(0.0, 0.0, 100.0, 10.0, 0.0, 0.0);
        assert_abs_diff_eq!(e, -100.0 * 10.0_f64.to_radians().sin(), epsilon = 1e-9);
        assert_abs_diff_eq!(d, 100.0 * 10.0_f64.to_radians().cos(), epsilon = 1e-9);
    }
}
