//! ASAS CLI - operator console for the conflict detection engine.
//!
//! - `console`: command parsing and dispatch onto the engine
//! - `sim`: flight paths and scenarios producing per-tick traffic

pub mod console;
pub mod settings;
pub mod sim;

pub use console::{parse, Console, ConsoleCommand};
pub use sim::{Scenario, ScenarioKind, Simulation};
