//! Per-tick conflict state and the cumulative conflict history.

use std::collections::HashSet;

use crate::strategy::{AgentPair, CanonicalPair, DetectionOutput};

/// Canonicalize directional pairs, keeping first-occurrence order.
fn canonicalize(pairs: &[AgentPair]) -> Vec<CanonicalPair> {
    let mut seen = HashSet::with_capacity(pairs.len());
    pairs
        .iter()
        .map(|&pair| CanonicalPair::from(pair))
        .filter(|pair| seen.insert(*pair))
        .collect()
}

/// Append-only list of distinct pairs in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct PairHistory {
    pairs: Vec<CanonicalPair>,
    seen: HashSet<CanonicalPair>,
}

impl PairHistory {
    /// Append the pairs never seen before and return how many were added.
    fn extend(&mut self, pairs: &[CanonicalPair]) -> usize {
        let before = self.pairs.len();
        for &pair in pairs {
            if self.seen.insert(pair) {
                self.pairs.push(pair);
            }
        }
        self.pairs.len() - before
    }

    pub fn pairs(&self) -> &[CanonicalPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, pair: &CanonicalPair) -> bool {
        self.seen.contains(pair)
    }

    fn clear(&mut self) {
        self.pairs.clear();
        self.seen.clear();
    }
}

/// Number of pairs first seen in one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub new_conflicts: usize,
    pub new_losses: usize,
}

/// Conflict and loss-of-separation state produced by the detection ticks.
#[derive(Debug, Clone, Default)]
pub struct ConflictAggregator {
    confpairs: Vec<AgentPair>,
    lospairs: Vec<AgentPair>,
    confpairs_unique: HashSet<CanonicalPair>,
    lospairs_unique: HashSet<CanonicalPair>,
    inconf: Vec<bool>,
    tcpamax: Vec<f64>,
    qdr: Vec<f64>,
    dist: Vec<f64>,
    dcpa: Vec<f64>,
    tcpa: Vec<f64>,
    tlos: Vec<f64>,
    confpairs_all: PairHistory,
    lospairs_all: PairHistory,
}

impl ConflictAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take one tick of raw detections as the current state and record
    /// newly seen pairs in the history.
    ///
    /// Pairs are appended to the history at most once, in the order their
    /// first direction appears in the raw detections.
    pub fn update(&mut self, output: DetectionOutput) -> TickSummary {
        let conf_unique = canonicalize(&output.confpairs);
        let los_unique = canonicalize(&output.lospairs);

        let summary = TickSummary {
            new_conflicts: self.confpairs_all.extend(&conf_unique),
            new_losses: self.lospairs_all.extend(&los_unique),
        };

        self.confpairs = output.confpairs;
        self.lospairs = output.lospairs;
        self.inconf = output.inconf;
        self.tcpamax = output.tcpamax;
        self.qdr = output.qdr;
        self.dist = output.dist;
        self.dcpa = output.dcpa;
        self.tcpa = output.tcpa;
        self.tlos = output.tlos;
        self.confpairs_unique = conf_unique.into_iter().collect();
        self.lospairs_unique = los_unique.into_iter().collect();

        summary
    }

    /// Drop the current state, keeping the history.
    pub fn clear(&mut self, ntraf: usize) {
        self.confpairs.clear();
        self.lospairs.clear();
        self.confpairs_unique.clear();
        self.lospairs_unique.clear();
        self.qdr.clear();
        self.dist.clear();
        self.dcpa.clear();
        self.tcpa.clear();
        self.tlos.clear();
        self.inconf = vec![false; ntraf];
        self.tcpamax = vec![0.0; ntraf];
    }

    /// Drop the current state and the history.
    pub fn reset(&mut self, ntraf: usize) {
        self.clear(ntraf);
        self.confpairs_all.clear();
        self.lospairs_all.clear();
    }

    /// Extend the per-aircraft arrays by `n` slots.
    pub fn create(&mut self, n: usize) {
        let ntraf = self.inconf.len() + n;
        self.inconf.resize(ntraf, false);
        self.tcpamax.resize(ntraf, 0.0);
    }

    /// Remove one per-aircraft slot. Callers validate `idx`.
    pub(crate) fn delete(&mut self, idx: usize) {
        self.inconf.remove(idx);
        self.tcpamax.remove(idx);
    }

    pub fn confpairs(&self) -> &[AgentPair] {
        &self.confpairs
    }

    pub fn lospairs(&self) -> &[AgentPair] {
        &self.lospairs
    }

    pub fn confpairs_unique(&self) -> &HashSet<CanonicalPair> {
        &self.confpairs_unique
    }

    pub fn lospairs_unique(&self) -> &HashSet<CanonicalPair> {
        &self.lospairs_unique
    }

    pub fn inconf(&self) -> &[bool] {
        &self.inconf
    }

    pub fn tcpamax(&self) -> &[f64] {
        &self.tcpamax
    }

    pub fn qdr(&self) -> &[f64] {
        &self.qdr
    }

    pub fn dist(&self) -> &[f64] {
        &self.dist
    }

    pub fn dcpa(&self) -> &[f64] {
        &self.dcpa
    }

    pub fn tcpa(&self) -> &[f64] {
        &self.tcpa
    }

    pub fn tlos(&self) -> &[f64] {
        &self.tlos
    }

    pub fn confpairs_all(&self) -> &PairHistory {
        &self.confpairs_all
    }

    pub fn lospairs_all(&self) -> &PairHistory {
        &self.lospairs_all
    }
}
