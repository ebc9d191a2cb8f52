//! Detection settings for a console session.

use anyhow::{Context, Result};
use asas_core::DetectionSettings;
use std::fs;
use std::path::Path;

/// Load settings from a JSON file if given, else from the environment.
pub fn load(path: Option<&Path>) -> Result<DetectionSettings> {
    let Some(path) = path else {
        return Ok(DetectionSettings::from_env());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    DetectionSettings::from_json(&raw)
        .with_context(|| format!("Invalid settings file {}", path.display()))
}
