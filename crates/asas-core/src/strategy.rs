//! The pluggable detection contract.
//!
//! A [`DetectionStrategy`] turns two traffic snapshots and the per-aircraft
//! protection zones into raw, directional pair detections. Strategies are
//! pure: the same inputs always give the same [`DetectionOutput`].

use serde::{Deserialize, Serialize};

use crate::traffic::TrafficSnapshot;

/// A directional detection `(ownship slot, intruder slot)`.
pub type AgentPair = (usize, usize);

/// Unordered pair of aircraft slots, stored as `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalPair(usize, usize);

impl CanonicalPair {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn first(&self) -> usize {
        self.0
    }

    pub fn second(&self) -> usize {
        self.1
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.0 == idx || self.1 == idx
    }
}

impl From<AgentPair> for CanonicalPair {
    fn from((a, b): AgentPair) -> Self {
        Self::new(a, b)
    }
}

/// Raw output of one detection pass.
///
/// `inconf` and `tcpamax` have one entry per ownship slot. The geometry
/// vectors (`qdr`, `dist`, `dcpa`, `tcpa`, `tlos`) have one entry per
/// element of `confpairs`, in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionOutput {
    pub confpairs: Vec<AgentPair>,
    pub lospairs: Vec<AgentPair>,
    pub inconf: Vec<bool>,
    pub tcpamax: Vec<f64>,
    /// Bearing from ownship to intruder (deg)
    pub qdr: Vec<f64>,
    /// Current distance (m)
    pub dist: Vec<f64>,
    /// Distance at closest point of approach (m)
    pub dcpa: Vec<f64>,
    /// Time to closest point of approach (s)
    pub tcpa: Vec<f64>,
    /// Time until the protection zone is entered (s)
    pub tlos: Vec<f64>,
}

impl DetectionOutput {
    /// An output that reports nothing for a population of `ntraf`.
    pub fn empty(ntraf: usize) -> Self {
        Self {
            inconf: vec![false; ntraf],
            tcpamax: vec![0.0; ntraf],
            ..Default::default()
        }
    }

    /// Record one directional conflict and its geometry.
    pub fn push_conflict(&mut self, pair: AgentPair, geometry: PairGeometry) {
        self.confpairs.push(pair);
        self.qdr.push(geometry.qdr);
        self.dist.push(geometry.dist);
        self.dcpa.push(geometry.dcpa);
        self.tcpa.push(geometry.tcpa);
        self.tlos.push(geometry.tlos);
    }

    /// Whether the geometry vectors line up with `confpairs`.
    pub fn geometry_aligned(&self) -> bool {
        let n = self.confpairs.len();
        [&self.qdr, &self.dist, &self.dcpa, &self.tcpa, &self.tlos]
            .iter()
            .all(|column| column.len() == n)
    }
}

/// Geometry of a single directional conflict.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PairGeometry {
    pub qdr: f64,
    pub dist: f64,
    pub dcpa: f64,
    pub tcpa: f64,
    pub tlos: f64,
}

/// A conflict detection method.
///
/// Implementations must report a conflict from both sides, `(a, b)` and
/// `(b, a)`, whenever both aircraft are part of the ownship and intruder
/// sets. Numerical trouble (zero closure rates, coincident positions) is
/// the strategy's to absorb; `detect` never panics.
pub trait DetectionStrategy: Send {
    /// Name under which the strategy is registered.
    fn name(&self) -> &str;

    /// Detect conflicts and losses of separation between `ownship` and
    /// `intruder`. Zone arrays are aligned with `ownship`.
    fn detect(
        &self,
        ownship: &TrafficSnapshot,
        intruder: &TrafficSnapshot,
        rpz: &[f64],
        hpz: &[f64],
        dtlookahead: &[f64],
    ) -> DetectionOutput;
}

/// The inert method used when detection is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetection;

impl DetectionStrategy for NoDetection {
    fn name(&self) -> &str {
        "OFF"
    }

    fn detect(
        &self,
        ownship: &TrafficSnapshot,
        _intruder: &TrafficSnapshot,
        _rpz: &[f64],
        _hpz: &[f64],
        _dtlookahead: &[f64],
    ) -> DetectionOutput {
        DetectionOutput::empty(ownship.ntraf())
    }
}
