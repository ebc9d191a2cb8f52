//! The conflict detection engine: parameters, method selection and
//! per-tick aggregation behind one console-facing API.

use tracing::{debug, info, warn};

use crate::aggregator::{ConflictAggregator, TickSummary};
use crate::command::CommandResult;
use crate::config::DetectionSettings;
use crate::error::DetectionError;
use crate::params::{ParamRequest, ParameterStore};
use crate::registry::{StrategyRegistry, OFF};
use crate::strategy::{DetectionOutput, DetectionStrategy};
use crate::traffic::TrafficSnapshot;
use crate::units::ZoneParam;

/// Conflict detection for one simulation run.
///
/// Must be driven from the simulation's control thread: population
/// changes, configuration and [`ConflictDetection::update`] never
/// interleave within a tick.
pub struct ConflictDetection {
    settings: DetectionSettings,
    params: ParameterStore,
    registry: StrategyRegistry,
    state: ConflictAggregator,
}

impl Default for ConflictDetection {
    fn default() -> Self {
        Self::new(DetectionSettings::default())
    }
}

impl ConflictDetection {
    /// Create an engine with the built-in methods registered and detection off.
    pub fn new(settings: DetectionSettings) -> Self {
        Self::with_registry(settings, StrategyRegistry::with_builtin())
    }

    /// Create an engine around a caller-assembled registry.
    pub fn with_registry(settings: DetectionSettings, registry: StrategyRegistry) -> Self {
        Self {
            params: ParameterStore::new(&settings),
            settings,
            registry,
            state: ConflictAggregator::new(),
        }
    }

    /// Add a detection method to the catalogue.
    pub fn register(&mut self, strategy: Box<dyn DetectionStrategy>) -> Result<(), DetectionError> {
        self.registry.register(strategy)
    }

    pub fn ntraf(&self) -> usize {
        self.params.ntraf()
    }

    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn state(&self) -> &ConflictAggregator {
        &self.state
    }

    pub fn list_methods(&self) -> Vec<String> {
        self.registry.list_names()
    }

    pub fn active_method(&self) -> &str {
        self.registry.active_name()
    }

    /// Notify the engine that `n` aircraft were appended to the population.
    pub fn create(&mut self, n: usize) {
        self.params.create(n);
        self.state.create(n);
    }

    /// Notify the engine that the given slots were removed from the population.
    ///
    /// Fails without side effects if any index is out of range. Pair lists
    /// of the current tick still use the old numbering until the next
    /// [`ConflictDetection::update`].
    pub fn delete(&mut self, indices: &[usize]) -> Result<(), DetectionError> {
        let ntraf = self.ntraf();
        if let Some(&idx) = indices.iter().find(|&&idx| idx >= ntraf) {
            return Err(DetectionError::AgentIndexOutOfRange { idx, ntraf });
        }
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for idx in sorted {
            self.params.delete(idx);
            self.state.delete(idx);
        }
        Ok(())
    }

    /// Select a detection method, or report the current one when `name` is `None`.
    ///
    /// Any successful selection clears the current conflict state.
    pub fn set_method(&mut self, name: Option<&str>) -> CommandResult {
        let Some(name) = name else {
            return CommandResult::success(format!(
                "Current CD method: {}\nAvailable CD methods: {}",
                self.registry.active_name(),
                self.registry.list_names().join(", ")
            ));
        };

        let selected = match self.registry.select(name) {
            Ok(selected) => selected.to_string(),
            Err(e) => return CommandResult::failure(e.to_string()),
        };
        self.clear();

        if selected == OFF {
            info!("Conflict detection turned off");
            CommandResult::success("Conflict Detection turned off.")
        } else {
            info!(method = %selected, "Selected CD method");
            CommandResult::success(format!("Selected {selected} as CD method."))
        }
    }

    /// Query or change one of the zone parameters.
    pub fn configure(&mut self, param: ZoneParam, request: ParamRequest) -> CommandResult {
        let result = self.params.apply(param, request);
        if result.is_ok() && matches!(request, ParamRequest::SetDefault(_)) {
            info!(?param, value = self.params.defaults().get(param), "Default changed");
        }
        result.into()
    }

    /// Horizontal protection zone radius, in NM.
    pub fn set_rpz(&mut self, request: ParamRequest) -> CommandResult {
        self.configure(ZoneParam::Radius, request)
    }

    /// Vertical protection zone half-height, in ft.
    pub fn set_hpz(&mut self, request: ParamRequest) -> CommandResult {
        self.configure(ZoneParam::Height, request)
    }

    /// Lookahead time, in seconds.
    pub fn set_dtlook(&mut self, request: ParamRequest) -> CommandResult {
        self.configure(ZoneParam::Lookahead, request)
    }

    /// Interval after a resolution in which detection is skipped, in seconds.
    pub fn set_dtnolook(&mut self, request: ParamRequest) -> CommandResult {
        self.configure(ZoneParam::NoLook, request)
    }

    /// Run one detection tick.
    ///
    /// `ownship` must be aligned with the engine's per-aircraft arrays. A
    /// mismatch is rejected and leaves all state untouched.
    pub fn update(
        &mut self,
        ownship: &TrafficSnapshot,
        intruder: &TrafficSnapshot,
    ) -> Result<TickSummary, DetectionError> {
        let ntraf = self.ntraf();
        if ownship.ntraf() != ntraf {
            return Err(DetectionError::PopulationMismatch {
                expected: ntraf,
                actual: ownship.ntraf(),
            });
        }

        let output = self.registry.active().detect(
            ownship,
            intruder,
            self.params.rpz(),
            self.params.hpz(),
            self.params.dtlookahead(),
        );
        let output = align_output(output, ntraf, self.registry.active_name());

        let nconf = output.confpairs.len();
        let nlos = output.lospairs.len();
        let summary = self.state.update(output);
        debug!(
            ntraf,
            confpairs = nconf,
            lospairs = nlos,
            unique_conf = self.state.confpairs_unique().len(),
            unique_los = self.state.lospairs_unique().len(),
            new_conf = summary.new_conflicts,
            new_los = summary.new_losses,
            "Detection step"
        );
        Ok(summary)
    }

    /// Clear the current conflict database. History is kept.
    pub fn clear(&mut self) {
        self.state.clear(self.ntraf());
    }

    /// Return to the state of a freshly loaded scenario: no aircraft, no
    /// conflicts, empty history and defaults from the process settings.
    /// The selected method is kept.
    pub fn reset(&mut self) {
        self.params.reset(&self.settings);
        self.state.reset(self.ntraf());
        info!("Conflict detection reset");
    }
}

/// Force a strategy's output into the shape the aggregator relies on.
fn align_output(mut output: DetectionOutput, ntraf: usize, method: &str) -> DetectionOutput {
    if output.inconf.len() != ntraf || output.tcpamax.len() != ntraf {
        warn!(
            method,
            ntraf,
            inconf = output.inconf.len(),
            tcpamax = output.tcpamax.len(),
            "Per-aircraft detection output misaligned, resizing"
        );
        output.inconf.resize(ntraf, false);
        output.tcpamax.resize(ntraf, 0.0);
    }
    if !output.geometry_aligned() {
        let n = output.confpairs.len();
        warn!(method, confpairs = n, "Conflict geometry misaligned, padding with NaN");
        for column in [
            &mut output.qdr,
            &mut output.dist,
            &mut output.dcpa,
            &mut output.tcpa,
            &mut output.tlos,
        ] {
            column.resize(n, f64::NAN);
        }
    }
    drop_self_pairs(output, method)
}

/// Remove `(a, a)` detections, together with their geometry.
fn drop_self_pairs(mut output: DetectionOutput, method: &str) -> DetectionOutput {
    let keep: Vec<bool> = output.confpairs.iter().map(|&(a, b)| a != b).collect();
    let nlos = output.lospairs.len();
    output.lospairs.retain(|&(a, b)| a != b);

    let dropped_conf = keep.iter().filter(|&&k| !k).count();
    let dropped_los = nlos - output.lospairs.len();
    if dropped_conf == 0 && dropped_los == 0 {
        return output;
    }
    warn!(
        method,
        confpairs = dropped_conf,
        lospairs = dropped_los,
        "Dropping self-pairs from detection output"
    );

    let mut flags = keep.iter();
    output.confpairs.retain(|_| flags.next().copied().unwrap_or(false));
    for column in [
        &mut output.qdr,
        &mut output.dist,
        &mut output.dcpa,
        &mut output.tcpa,
        &mut output.tlos,
    ] {
        let mut flags = keep.iter();
        column.retain(|_| flags.next().copied().unwrap_or(false));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{CanonicalPair, PairGeometry};
    use crate::traffic::AircraftState;

    struct Ragged;

    impl DetectionStrategy for Ragged {
        fn name(&self) -> &str {
            "RAGGED"
        }

        fn detect(
            &self,
            _ownship: &TrafficSnapshot,
            _intruder: &TrafficSnapshot,
            _rpz: &[f64],
            _hpz: &[f64],
            _dtlookahead: &[f64],
        ) -> DetectionOutput {
            DetectionOutput {
                confpairs: vec![(0, 1), (1, 0)],
                qdr: vec![90.0],
                ..Default::default()
            }
        }
    }

    /// Reports every aircraft in conflict with itself, plus one real pair.
    struct SelfPairs;

    impl DetectionStrategy for SelfPairs {
        fn name(&self) -> &str {
            "SELFPAIRS"
        }

        fn detect(
            &self,
            ownship: &TrafficSnapshot,
            _intruder: &TrafficSnapshot,
            _rpz: &[f64],
            _hpz: &[f64],
            _dtlookahead: &[f64],
        ) -> DetectionOutput {
            let mut output = DetectionOutput::empty(ownship.ntraf());
            for (pair, tcpa) in [((1, 1), 10.0), ((0, 2), 20.0), ((2, 0), 30.0)] {
                output.push_conflict(
                    pair,
                    PairGeometry {
                        tcpa,
                        ..Default::default()
                    },
                );
            }
            output.lospairs = vec![(1, 1), (0, 2)];
            output
        }
    }

    fn traffic(n: usize) -> TrafficSnapshot {
        (0..n)
            .map(|i| AircraftState::new(format!("AC{i}"), 52.0 + i as f64, 4.0, 3000.0))
            .collect()
    }

    #[test]
    fn query_reports_current_method() {
        let mut cd = ConflictDetection::default();
        let reply = cd.set_method(None);
        assert!(reply.ok);
        assert_eq!(
            reply.message,
            "Current CD method: OFF\nAvailable CD methods: OFF, STATEBASED"
        );
    }

    #[test]
    fn update_rejects_misaligned_population() {
        let mut cd = ConflictDetection::default();
        cd.create(2);
        let snapshot = traffic(3);
        assert_eq!(
            cd.update(&snapshot, &snapshot),
            Err(DetectionError::PopulationMismatch { expected: 2, actual: 3 })
        );
    }

    #[test]
    fn misaligned_strategy_output_is_resized() {
        let mut cd = ConflictDetection::default();
        cd.register(Box::new(Ragged)).unwrap();
        assert!(cd.set_method(Some("RAGGED")).ok);
        cd.create(2);
        let snapshot = traffic(2);
        cd.update(&snapshot, &snapshot).unwrap();

        let state = cd.state();
        assert_eq!(state.inconf().len(), 2);
        assert_eq!(state.tcpamax().len(), 2);
        assert_eq!(state.qdr()[0], 90.0);
        assert!(state.qdr()[1].is_nan());
        assert_eq!(state.tlos().len(), 2);
    }

    #[test]
    fn self_pairs_never_reach_history() {
        let mut cd = ConflictDetection::default();
        cd.register(Box::new(SelfPairs)).unwrap();
        assert!(cd.set_method(Some("SELFPAIRS")).ok);
        cd.create(3);
        let snapshot = traffic(3);
        cd.update(&snapshot, &snapshot).unwrap();

        let state = cd.state();
        assert_eq!(state.confpairs(), &[(0, 2), (2, 0)]);
        assert_eq!(state.tcpa(), &[20.0, 30.0]);
        assert_eq!(state.lospairs(), &[(0, 2)]);
        assert_eq!(state.confpairs_all().pairs(), &[CanonicalPair::new(0, 2)]);
        assert_eq!(state.lospairs_all().pairs(), &[CanonicalPair::new(0, 2)]);
        assert!(!state.confpairs_unique().contains(&CanonicalPair::new(1, 1)));
    }

    #[test]
    fn delete_validates_before_removing() {
        let mut cd = ConflictDetection::default();
        cd.create(3);
        assert!(cd.delete(&[0, 5]).is_err());
        assert_eq!(cd.ntraf(), 3);

        cd.delete(&[2, 0, 2]).unwrap();
        assert_eq!(cd.ntraf(), 1);
        assert_eq!(cd.state().inconf().len(), 1);
    }

    #[test]
    fn per_agent_request_out_of_range_fails() {
        let mut cd = ConflictDetection::default();
        cd.create(1);
        let reply = cd.set_hpz(ParamRequest::SetForAgent { idx: 3, value: 500.0 });
        assert!(!reply.ok);
        assert_eq!(reply.message, "Aircraft index 3 out of range (ntraf = 1)");
    }
}
