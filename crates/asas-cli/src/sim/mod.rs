//! Traffic simulation feeding the detection engine.
//!
//! Provides flight paths, scenarios, and a fixed-step clock that turns a
//! scenario into one traffic snapshot per tick.

mod paths;
mod scenarios;

pub use paths::{FlightPath, LinearPath};
pub use scenarios::{
    create_converging_scenario, create_crossing_scenario, create_parallel_scenario,
    create_random_scenario, Scenario, ScenarioKind,
};

use asas_core::TrafficSnapshot;

/// A scenario advanced in fixed time steps.
pub struct Simulation {
    scenario: Scenario,
    dt: f64,
    simt: f64,
}

impl Simulation {
    pub fn new(scenario: Scenario, dt: f64) -> Self {
        Self {
            scenario,
            dt,
            simt: 0.0,
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn ntraf(&self) -> usize {
        self.scenario.len()
    }

    /// Simulation time in seconds.
    pub fn simt(&self) -> f64 {
        self.simt
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Callsign of the aircraft in slot `idx`.
    pub fn callsign(&self, idx: usize) -> &str {
        self.scenario
            .aircraft
            .get(idx)
            .map(|(id, _)| id.as_str())
            .unwrap_or("?")
    }

    /// Traffic at the current simulation time.
    pub fn snapshot(&self) -> TrafficSnapshot {
        self.scenario
            .aircraft
            .iter()
            .map(|(id, path)| path.state_at(id, self.simt))
            .collect()
    }

    /// Advance the clock by one step and return the new traffic.
    pub fn advance(&mut self) -> TrafficSnapshot {
        self.simt += self.dt;
        self.snapshot()
    }

    /// Rewind to the start of the scenario.
    pub fn restart(&mut self) {
        self.simt = 0.0;
    }
}
