//! Flight path implementations.

use asas_core::spatial::{bearing, offset_by_bearing};
use asas_core::AircraftState;

/// Trait for flight path implementations.
pub trait FlightPath: Send + Sync {
    /// Get (lat, lon, altitude_m) at time t seconds from start.
    fn get_position(&self, t: f64) -> (f64, f64, f64);

    /// Ground track at time t (degrees, 0 = North).
    fn get_track(&self, t: f64) -> f64;

    /// Ground speed in meters per second.
    fn get_speed_mps(&self) -> f64;

    /// Vertical speed in meters per second.
    fn get_vertical_speed_mps(&self) -> f64 {
        0.0
    }

    /// Full aircraft state at time t.
    fn state_at(&self, id: &str, t: f64) -> AircraftState {
        let (lat, lon, alt_m) = self.get_position(t);
        AircraftState::new(id, lat, lon, alt_m).with_velocity(
            self.get_track(t),
            self.get_speed_mps(),
            self.get_vertical_speed_mps(),
        )
    }
}

/// Straight great-circle track flown at constant speed and vertical rate.
///
/// The aircraft keeps flying past any reference point; tracks never end.
pub struct LinearPath {
    pub start_lat: f64,
    pub start_lon: f64,
    pub track_deg: f64,
    pub altitude_m: f64,
    pub speed_mps: f64,
    pub vertical_speed_mps: f64,
}

impl LinearPath {
    pub fn new(
        start_lat: f64,
        start_lon: f64,
        track_deg: f64,
        altitude_m: f64,
        speed_mps: f64,
    ) -> Self {
        Self {
            start_lat,
            start_lon,
            track_deg: track_deg.rem_euclid(360.0),
            altitude_m,
            speed_mps,
            vertical_speed_mps: 0.0,
        }
    }

    /// A track from the start point through `(via_lat, via_lon)`.
    pub fn toward(
        start_lat: f64,
        start_lon: f64,
        via_lat: f64,
        via_lon: f64,
        altitude_m: f64,
        speed_mps: f64,
    ) -> Self {
        let track_deg = bearing(start_lat, start_lon, via_lat, via_lon).to_degrees();
        Self::new(start_lat, start_lon, track_deg, altitude_m, speed_mps)
    }

    /// Set a constant climb (positive) or descent rate.
    pub fn with_vertical_speed(mut self, vertical_speed_mps: f64) -> Self {
        self.vertical_speed_mps = vertical_speed_mps;
        self
    }
}

impl FlightPath for LinearPath {
    fn get_position(&self, t: f64) -> (f64, f64, f64) {
        let t = t.max(0.0);
        let (lat, lon) = offset_by_bearing(
            self.start_lat,
            self.start_lon,
            self.speed_mps * t,
            self.track_deg.to_radians(),
        );
        (lat, lon, self.altitude_m + self.vertical_speed_mps * t)
    }

    fn get_track(&self, _t: f64) -> f64 {
        self.track_deg
    }

    fn get_speed_mps(&self) -> f64 {
        self.speed_mps
    }

    fn get_vertical_speed_mps(&self) -> f64 {
        self.vertical_speed_mps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asas_core::spatial::haversine_distance;

    #[test]
    fn test_linear_path_start_position() {
        let path = LinearPath::new(52.0, 4.0, 90.0, 3000.0, 200.0);
        let (lat, lon, alt) = path.get_position(0.0);

        assert!((lat - 52.0).abs() < 0.0001);
        assert!((lon - 4.0).abs() < 0.0001);
        assert!((alt - 3000.0).abs() < 0.01);
    }

    #[test]
    fn test_linear_path_covers_speed_times_time() {
        let path = LinearPath::new(52.0, 4.0, 45.0, 3000.0, 200.0).with_vertical_speed(-5.0);
        let (lat, lon, alt) = path.get_position(60.0);

        let dist = haversine_distance(52.0, 4.0, lat, lon);
        assert!((dist - 12_000.0).abs() < 1.0);
        assert!((alt - 2700.0).abs() < 0.01);
    }

    #[test]
    fn test_toward_points_at_target() {
        let path = LinearPath::toward(52.0, 3.0, 52.0, 4.0, 3000.0, 200.0);
        assert!((path.track_deg - 90.0).abs() < 1.0);

        let state = path.state_at("KL204", 0.0);
        assert_eq!(state.id, "KL204");
        assert_eq!(state.gs_mps, 200.0);
        assert!(state.gseast() > 199.0);
    }
}
