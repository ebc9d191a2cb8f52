//! Error types for the detection engine.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectionError {
    #[error("{name} doesn't exist.\nAvailable CD methods: {available}")]
    UnknownMethod { name: String, available: String },

    #[error("No CD methods registered besides OFF")]
    NoMethodsRegistered,

    /// `OFF` and `ON` are console keywords, not method names.
    #[error("{0} is a reserved CD method name")]
    ReservedName(String),

    #[error("CD method {0} is already registered")]
    DuplicateMethod(String),

    #[error("Aircraft index {idx} out of range (ntraf = {ntraf})")]
    AgentIndexOutOfRange { idx: usize, ntraf: usize },

    #[error("Traffic snapshot has {actual} aircraft, detection arrays hold {expected}")]
    PopulationMismatch { expected: usize, actual: usize },
}
