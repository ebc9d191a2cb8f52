//! Spherical-earth geometry used by the detection strategies and the simulator.

use std::f64::consts::{PI, TAU};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two positions given in degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let half_dphi = (phi2 - phi1) / 2.0;
    let half_dlambda = (lon2 - lon1).to_radians() / 2.0;
    let h = half_dphi.sin().powi(2) + phi1.cos() * phi2.cos() * half_dlambda.sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from point 1 to point 2, in radians in `(-π, π]`
/// (0 = north, π/2 = east).
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dlambda = (lon2 - lon1).to_radians();
    let east = dlambda.sin() * phi2.cos();
    let north = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    east.atan2(north)
}

/// Bearing (degrees, `[0, 360)`) and distance (meters) from point 1 to point 2.
pub fn qdrdist(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> (f64, f64) {
    let qdr = bearing(lat1, lon1, lat2, lon2).to_degrees().rem_euclid(360.0);
    (qdr, haversine_distance(lat1, lon1, lat2, lon2))
}

/// Position reached after travelling `distance_m` along the great circle
/// with initial bearing `bearing_rad` (0 = north, π/2 = east).
///
/// Returns `(lat, lon)` in degrees, longitude wrapped to `[-180, 180)`.
pub fn offset_by_bearing(lat: f64, lon: f64, distance_m: f64, bearing_rad: f64) -> (f64, f64) {
    if distance_m.abs() <= f64::EPSILON {
        return (lat, lon);
    }

    let phi1 = lat.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;
    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let (sin_delta, cos_delta) = delta.sin_cos();

    let sin_phi2 =
        (sin_phi1 * cos_delta + cos_phi1 * sin_delta * bearing_rad.cos()).clamp(-1.0, 1.0);
    let dlambda = (bearing_rad.sin() * sin_delta * cos_phi1).atan2(cos_delta - sin_phi1 * sin_phi2);
    let lambda2 = (lon.to_radians() + dlambda + PI).rem_euclid(TAU) - PI;

    (sin_phi2.asin().to_degrees(), lambda2.to_degrees())
}
