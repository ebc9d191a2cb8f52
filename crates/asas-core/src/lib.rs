//! Conflict detection for tick-driven air traffic simulation.
//!
//! Each tick the [`ConflictDetection`] engine runs the selected
//! [`DetectionStrategy`] over the current traffic, keeps the deduplicated
//! conflicts and losses of separation for that tick, and records every
//! distinct pair ever seen.

pub mod aggregator;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod params;
pub mod registry;
pub mod spatial;
pub mod statebased;
pub mod strategy;
pub mod traffic;
pub mod units;

pub use aggregator::{ConflictAggregator, PairHistory, TickSummary};
pub use command::CommandResult;
pub use config::DetectionSettings;
pub use engine::ConflictDetection;
pub use error::DetectionError;
pub use params::{ParamRequest, ParameterStore, ZoneDefaults};
pub use registry::{StrategyRegistry, OFF, ON};
pub use statebased::StateBased;
pub use strategy::{
    AgentPair, CanonicalPair, DetectionOutput, DetectionStrategy, NoDetection, PairGeometry,
};
pub use traffic::{AircraftState, TrafficSnapshot};
pub use units::{ZoneParam, FT, NM};
