//! Beam re-steering for a sound-speed ratio error at the transducer

use std::f64::consts::{FRAC_PI_2, PI};

/// Re-steer a beam vector for a beamforming sound-speed ratio.
///
/// The vector is split into range, along-track elevation `alpha` and
/// across-track angle `beta`. With the roll removed from `beta`, the sine
/// of the steering angle is scaled by `snell` (Snell's law) and the roll
/// added back. `roll` is in degrees; a ratio of exactly 1 is a no-op.
///
/// Returns the new (across_track, along_track, z).
pub fn snell_correction(snell: f64, roll: f64, across_track: f64, along_track: f64, z: f64) -> (f64, f64, f64) {
    if snell == 1.0 {
        return (across_track, along_track, z);
    }

    let range = (across_track * across_track + along_track * along_track + z * z).sqrt();
    let (alpha, mut beta) = if range.abs() < 0.001 {
        (0.0, FRAC_PI_2)
    } else {
        let alpha = (along_track / range).clamp(-1.0, 1.0).asin();
        let beta = (across_track / range / alpha.cos()).clamp(-1.0, 1.0).acos();
        (alpha, beta)
    };
    if z < 0.0 {
        beta = 2.0 * PI - beta;
    }

    let roll = roll.to_radians();
    beta -= roll;
    beta = (snell * (beta - FRAC_PI_2).sin()).clamp(-1.0, 1.0).asin() + FRAC_PI_2;
    beta += roll;

    (
        range * alpha.cos() * beta.cos(),
        range * alpha.sin(),
        range * alpha.cos() * beta.sin(),
    )
}
