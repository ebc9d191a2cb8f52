//! Display-unit conversion for the separation parameters.
//!
//! The console speaks nautical miles, feet and seconds; everything stored
//! in the engine is SI.

use serde::{Deserialize, Serialize};

/// Meters per nautical mile.
pub const NM: f64 = 1852.0;
/// Meters per foot.
pub const FT: f64 = 0.3048;

/// One of the four per-aircraft detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneParam {
    /// Horizontal protection zone radius (`rpz`)
    Radius,
    /// Vertical protection zone half-height (`hpz`)
    Height,
    /// Lookahead time (`dtlookahead`)
    Lookahead,
    /// Detection suppression after a resolution (`dtnolook`)
    NoLook,
}

impl ZoneParam {
    /// SI units per display unit.
    pub fn factor(self) -> f64 {
        match self {
            ZoneParam::Radius => NM,
            ZoneParam::Height => FT,
            ZoneParam::Lookahead | ZoneParam::NoLook => 1.0,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            ZoneParam::Radius => "NM",
            ZoneParam::Height => "ft",
            ZoneParam::Lookahead | ZoneParam::NoLook => "sec",
        }
    }

    /// Human-readable label used in console replies.
    pub fn label(self) -> &'static str {
        match self {
            ZoneParam::Radius => "PZ radius",
            ZoneParam::Height => "PZ height",
            ZoneParam::Lookahead => "lookahead time",
            ZoneParam::NoLook => "nolook time",
        }
    }

    pub fn to_si(self, display_value: f64) -> f64 {
        display_value * self.factor()
    }

    pub fn from_si(self, si_value: f64) -> f64 {
        si_value / self.factor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_converts_through_nautical_miles() {
        assert_eq!(ZoneParam::Radius.to_si(5.0), 9260.0);
        assert!((ZoneParam::Radius.from_si(9260.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn height_uses_feet() {
        assert!((ZoneParam::Height.to_si(1000.0) - 304.8).abs() < 1e-9);
    }

    #[test]
    fn time_parameters_are_unscaled() {
        assert_eq!(ZoneParam::Lookahead.to_si(300.0), 300.0);
        assert_eq!(ZoneParam::NoLook.from_si(12.5), 12.5);
    }
}
