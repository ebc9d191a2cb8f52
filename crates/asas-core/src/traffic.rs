//! Traffic snapshots handed to the detection engine each tick.
//!
//! Aircraft are addressed by slot index only; `id` is carried for display.

use serde::{Deserialize, Serialize};

/// Current position and velocity of one aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftState {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub alt_m: f64,
    /// Ground track (degrees, 0 = North, clockwise)
    #[serde(default)]
    pub trk_deg: f64,
    /// Ground speed (m/s)
    #[serde(default)]
    pub gs_mps: f64,
    /// Vertical speed (m/s, positive = climbing)
    #[serde(default)]
    pub vs_mps: f64,
}

impl AircraftState {
    /// Create a stationary aircraft with only required fields.
    pub fn new(id: impl Into<String>, lat: f64, lon: f64, alt_m: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            alt_m,
            trk_deg: 0.0,
            gs_mps: 0.0,
            vs_mps: 0.0,
        }
    }

    /// Set track, ground speed and vertical speed.
    pub fn with_velocity(mut self, trk_deg: f64, gs_mps: f64, vs_mps: f64) -> Self {
        self.trk_deg = trk_deg;
        self.gs_mps = gs_mps;
        self.vs_mps = vs_mps;
        self
    }

    /// East component of ground speed (m/s).
    pub fn gseast(&self) -> f64 {
        self.gs_mps * self.trk_deg.to_radians().sin()
    }

    /// North component of ground speed (m/s).
    pub fn gsnorth(&self) -> f64 {
        self.gs_mps * self.trk_deg.to_radians().cos()
    }
}

/// The traffic population at one simulation tick, index-aligned with the
/// engine's per-aircraft arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    aircraft: Vec<AircraftState>,
}

impl TrafficSnapshot {
    pub fn new(aircraft: Vec<AircraftState>) -> Self {
        Self { aircraft }
    }

    pub fn ntraf(&self) -> usize {
        self.aircraft.len()
    }

    pub fn get(&self, idx: usize) -> Option<&AircraftState> {
        self.aircraft.get(idx)
    }

    pub fn aircraft(&self) -> &[AircraftState] {
        &self.aircraft
    }

    pub fn push(&mut self, state: AircraftState) {
        self.aircraft.push(state);
    }
}

impl FromIterator<AircraftState> for TrafficSnapshot {
    fn from_iter<I: IntoIterator<Item = AircraftState>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
