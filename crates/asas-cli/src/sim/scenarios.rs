//! Pre-defined traffic scenarios for exercising conflict detection.

use asas_core::spatial::offset_by_bearing;
use asas_core::NM;
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use super::paths::LinearPath;
use super::FlightPath;

/// Distance from the scenario center at which aircraft start.
const START_OFFSET_M: f64 = 30.0 * NM;
const CRUISE_ALT_M: f64 = 10_000.0;
const CRUISE_SPEED_MPS: f64 = 230.0;

/// Available scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioKind {
    /// Two aircraft crossing at right angles over the center
    Crossing,
    /// Two aircraft on parallel tracks 10 NM apart
    Parallel,
    /// Four aircraft converging on the center from the cardinal directions
    Converging,
    /// Randomly placed traffic around the center
    Random,
}

/// A named scenario consisting of multiple aircraft with flight paths.
pub struct Scenario {
    pub name: String,
    pub aircraft: Vec<(String, Arc<dyn FlightPath>)>,
}

impl Scenario {
    pub fn build(kind: ScenarioKind, center_lat: f64, center_lon: f64, seed: u64) -> Self {
        match kind {
            ScenarioKind::Crossing => create_crossing_scenario(center_lat, center_lon),
            ScenarioKind::Parallel => create_parallel_scenario(center_lat, center_lon),
            ScenarioKind::Converging => create_converging_scenario(center_lat, center_lon),
            ScenarioKind::Random => create_random_scenario(center_lat, center_lon, 8, seed),
        }
    }

    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }
}

/// Two aircraft on a collision course through the center.
///
/// - Aircraft 1: flying West to East
/// - Aircraft 2: flying South to North
pub fn create_crossing_scenario(center_lat: f64, center_lon: f64) -> Scenario {
    let (lat1, lon1) =
        offset_by_bearing(center_lat, center_lon, START_OFFSET_M, 270f64.to_radians());
    let (lat2, lon2) =
        offset_by_bearing(center_lat, center_lon, START_OFFSET_M, 180f64.to_radians());

    Scenario {
        name: "crossing".to_string(),
        aircraft: vec![
            (
                "KL204".to_string(),
                Arc::new(LinearPath::toward(
                    lat1,
                    lon1,
                    center_lat,
                    center_lon,
                    CRUISE_ALT_M,
                    CRUISE_SPEED_MPS,
                )) as Arc<dyn FlightPath>,
            ),
            (
                "BA117".to_string(),
                Arc::new(LinearPath::toward(
                    lat2,
                    lon2,
                    center_lat,
                    center_lon,
                    CRUISE_ALT_M,
                    CRUISE_SPEED_MPS,
                )) as Arc<dyn FlightPath>,
            ),
        ],
    }
}

/// Two aircraft flying parallel tracks outside each other's protection zone.
pub fn create_parallel_scenario(center_lat: f64, center_lon: f64) -> Scenario {
    let separation_m = 10.0 * NM;
    let (lat1, lon1) =
        offset_by_bearing(center_lat, center_lon, START_OFFSET_M, 270f64.to_radians());
    let (lat2, lon2) = offset_by_bearing(lat1, lon1, separation_m, 0.0);

    Scenario {
        name: "parallel".to_string(),
        aircraft: vec![
            (
                "KL204".to_string(),
                Arc::new(LinearPath::new(
                    lat1,
                    lon1,
                    90.0,
                    CRUISE_ALT_M,
                    CRUISE_SPEED_MPS,
                )) as Arc<dyn FlightPath>,
            ),
            (
                "BA117".to_string(),
                Arc::new(LinearPath::new(
                    lat2,
                    lon2,
                    90.0,
                    CRUISE_ALT_M,
                    CRUISE_SPEED_MPS,
                )) as Arc<dyn FlightPath>,
            ),
        ],
    }
}

/// Four aircraft converging on the center, one of them descending.
pub fn create_converging_scenario(center_lat: f64, center_lon: f64) -> Scenario {
    let angles: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

    let aircraft = angles
        .iter()
        .enumerate()
        .map(|(i, &angle)| {
            let (lat, lon) =
                offset_by_bearing(center_lat, center_lon, START_OFFSET_M, angle.to_radians());
            let mut path =
                LinearPath::toward(lat, lon, center_lat, center_lon, CRUISE_ALT_M, 200.0);
            if i == 3 {
                path = path.with_vertical_speed(-5.0);
            }
            (format!("AC{:03}", i + 1), Arc::new(path) as Arc<dyn FlightPath>)
        })
        .collect();

    Scenario {
        name: "converging".to_string(),
        aircraft,
    }
}

/// `count` aircraft at random positions, tracks, speeds and flight levels.
pub fn create_random_scenario(
    center_lat: f64,
    center_lon: f64,
    count: usize,
    seed: u64,
) -> Scenario {
    let mut rng = StdRng::seed_from_u64(seed);

    let aircraft = (0..count)
        .map(|i| {
            let (lat, lon) = offset_by_bearing(
                center_lat,
                center_lon,
                rng.random_range(0.0..START_OFFSET_M),
                rng.random_range(0.0..360f64).to_radians(),
            );
            // Flight levels 300..=340 in 1000 ft steps
            let flight_level = 300.0 + 10.0 * rng.random_range(0..5) as f64;
            let path = LinearPath::new(
                lat,
                lon,
                rng.random_range(0.0..360.0),
                flight_level * 100.0 * asas_core::FT,
                rng.random_range(180.0..260.0),
            );
            (format!("RND{:03}", i + 1), Arc::new(path) as Arc<dyn FlightPath>)
        })
        .collect();

    Scenario {
        name: "random".to_string(),
        aircraft,
    }
}
