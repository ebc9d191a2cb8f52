//! Process-wide detection settings.
//!
//! These are the values the global defaults start from, and the values a
//! full reset restores them to.

use serde::{Deserialize, Serialize};
use std::env;

/// Initial protection zone and timing settings, in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// Protection zone radius (NM)
    #[serde(default = "default_pzr")]
    pub pzr_nm: f64,
    /// Protection zone half-height (ft)
    #[serde(default = "default_pzh")]
    pub pzh_ft: f64,
    /// Lookahead time (s)
    #[serde(default = "default_dtlookahead")]
    pub dtlookahead_s: f64,
    /// No-look interval after a resolution (s)
    #[serde(default)]
    pub dtnolook_s: f64,
}

fn default_pzr() -> f64 {
    5.0
}

fn default_pzh() -> f64 {
    1000.0
}

fn default_dtlookahead() -> f64 {
    300.0
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            pzr_nm: default_pzr(),
            pzh_ft: default_pzh(),
            dtlookahead_s: default_dtlookahead(),
            dtnolook_s: 0.0,
        }
    }
}

impl DetectionSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            pzr_nm: env_f64("ASAS_PZR").unwrap_or(defaults.pzr_nm),
            pzh_ft: env_f64("ASAS_PZH").unwrap_or(defaults.pzh_ft),
            dtlookahead_s: env_f64("ASAS_DTLOOKAHEAD").unwrap_or(defaults.dtlookahead_s),
            dtnolook_s: env_f64("ASAS_DTNOLOOK").unwrap_or(defaults.dtnolook_s),
        }
    }

    /// Parse settings from a JSON document. Missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
