//! State-based conflict detection.
//!
//! Extrapolates every aircraft along its current ground track, ground speed
//! and vertical speed, and finds the time window in which each pair is
//! inside the combined protection zone.

use crate::spatial::qdrdist;
use crate::strategy::{DetectionOutput, DetectionStrategy, PairGeometry};
use crate::traffic::{AircraftState, TrafficSnapshot};

/// Floor for squared relative speed and vertical rate.
const MIN_RATE: f64 = 1e-6;
/// Sentinel for "never" in the horizontal window.
const NEVER: f64 = 1e8;

#[derive(Debug, Clone, Copy, Default)]
pub struct StateBased;

impl StateBased {
    pub const NAME: &'static str = "STATEBASED";
}

/// Combined zone for a pair: the larger of both aircraft's values when the
/// intruder set is aligned with the zone arrays, otherwise the ownship's.
fn pair_zone(zone: &[f64], i: usize, j: usize, aligned: bool) -> f64 {
    let own = zone.get(i).copied().unwrap_or(0.0);
    if aligned {
        zone.get(j).map_or(own, |&other| own.max(other))
    } else {
        own
    }
}

/// Outcome of analysing one directional pair.
struct PairAssessment {
    conflict: bool,
    los: bool,
    geometry: PairGeometry,
}

fn assess(
    own: &AircraftState,
    intr: &AircraftState,
    rpz: f64,
    hpz: f64,
    dtlookahead: f64,
) -> PairAssessment {
    let (qdr, dist) = qdrdist(own.lat, own.lon, intr.lat, intr.lon);
    let qdr_rad = qdr.to_radians();
    let dx = dist * qdr_rad.sin();
    let dy = dist * qdr_rad.cos();

    // Intruder velocity relative to ownship
    let du = intr.gseast() - own.gseast();
    let dv = intr.gsnorth() - own.gsnorth();
    let mut dv2 = du * du + dv * dv;
    if dv2.abs() < MIN_RATE {
        dv2 = MIN_RATE;
    }
    let vrel = dv2.sqrt();

    let tcpa = -(du * dx + dv * dy) / dv2;
    let dcpa2 = (dist * dist - tcpa * tcpa * dv2).abs();

    // Horizontal window
    let r2 = rpz * rpz;
    let horizontal = dcpa2 < r2;
    let dtinhor = (r2 - dcpa2).max(0.0).sqrt() / vrel;
    let (tinhor, touthor) = if horizontal {
        (tcpa - dtinhor, tcpa + dtinhor)
    } else {
        (NEVER, -NEVER)
    };

    // Vertical window
    let dalt = own.alt_m - intr.alt_m;
    let mut dvs = own.vs_mps - intr.vs_mps;
    if dvs.abs() < MIN_RATE {
        dvs = MIN_RATE;
    }
    let tcrosshi = (dalt + hpz) / -dvs;
    let tcrosslo = (dalt - hpz) / -dvs;
    let tinver = tcrosshi.min(tcrosslo);
    let toutver = tcrosshi.max(tcrosslo);

    let tinconf = tinver.max(tinhor);
    let toutconf = toutver.min(touthor);

    PairAssessment {
        conflict: horizontal && tinconf <= toutconf && toutconf > 0.0 && tinconf < dtlookahead,
        los: dist < rpz && dalt.abs() < hpz,
        geometry: PairGeometry {
            qdr,
            dist,
            dcpa: dcpa2.sqrt(),
            tcpa,
            tlos: tinconf,
        },
    }
}

impl DetectionStrategy for StateBased {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn detect(
        &self,
        ownship: &TrafficSnapshot,
        intruder: &TrafficSnapshot,
        rpz: &[f64],
        hpz: &[f64],
        dtlookahead: &[f64],
    ) -> DetectionOutput {
        let mut output = DetectionOutput::empty(ownship.ntraf());
        // Same population on both sides: slot i is the same aircraft in each
        let same_set = intruder.ntraf() == ownship.ntraf();
        let aligned = intruder.ntraf() == rpz.len();

        for (i, own) in ownship.aircraft().iter().enumerate() {
            let lookahead = dtlookahead.get(i).copied().unwrap_or(0.0);
            for (j, intr) in intruder.aircraft().iter().enumerate() {
                if same_set && i == j {
                    continue;
                }
                let assessment = assess(
                    own,
                    intr,
                    pair_zone(rpz, i, j, aligned),
                    pair_zone(hpz, i, j, aligned),
                    lookahead,
                );
                if assessment.los {
                    output.lospairs.push((i, j));
                }
                if assessment.conflict {
                    output.inconf[i] = true;
                    output.tcpamax[i] = output.tcpamax[i].max(assessment.geometry.tcpa);
                    output.push_conflict((i, j), assessment.geometry);
                }
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::offset_by_bearing;
    use crate::units::{FT, NM};

    const RPZ: f64 = 5.0 * NM;
    const HPZ: f64 = 1000.0 * FT;

    fn run(traffic: &TrafficSnapshot) -> DetectionOutput {
        let n = traffic.ntraf();
        StateBased.detect(traffic, traffic, &vec![RPZ; n], &vec![HPZ; n], &vec![300.0; n])
    }

    fn head_on(separation_nm: f64, alt2_m: f64) -> TrafficSnapshot {
        let (lat2, lon2) = offset_by_bearing(52.0, 4.0, separation_nm * NM, 90f64.to_radians());
        TrafficSnapshot::new(vec![
            AircraftState::new("KL204", 52.0, 4.0, 3000.0).with_velocity(90.0, 250.0, 0.0),
            AircraftState::new("BA117", lat2, lon2, alt2_m).with_velocity(270.0, 250.0, 0.0),
        ])
    }

    #[test]
    fn head_on_traffic_conflicts_from_both_sides() {
        let output = run(&head_on(20.0, 3000.0));

        assert_eq!(output.confpairs, vec![(0, 1), (1, 0)]);
        assert!(output.lospairs.is_empty());
        assert_eq!(output.inconf, vec![true, true]);
        assert!(output.geometry_aligned());

        // 20 NM closing at 500 m/s
        let expected_tcpa = 20.0 * NM / 500.0;
        assert!((output.tcpa[0] - expected_tcpa).abs() < 1.0);
        assert!(output.dcpa[0] < 100.0);
        assert!(output.tlos[0] > 0.0 && output.tlos[0] < output.tcpa[0]);
        assert!((output.qdr[0] - 90.0).abs() < 1.0);
        assert!((output.tcpamax[1] - expected_tcpa).abs() < 1.0);
    }

    #[test]
    fn vertical_separation_prevents_conflict() {
        let output = run(&head_on(20.0, 3000.0 + 2000.0 * FT));
        assert!(output.confpairs.is_empty());
        assert_eq!(output.inconf, vec![false, false]);
    }

    #[test]
    fn conflict_beyond_lookahead_is_ignored() {
        // 200 NM apart closes in ~740 s
        let output = run(&head_on(200.0, 3000.0));
        assert!(output.confpairs.is_empty());
    }

    #[test]
    fn parallel_traffic_outside_zone_does_not_conflict() {
        let (lat2, lon2) = offset_by_bearing(52.0, 4.0, 10.0 * NM, 0.0);
        let traffic = TrafficSnapshot::new(vec![
            AircraftState::new("A", 52.0, 4.0, 3000.0).with_velocity(90.0, 200.0, 0.0),
            AircraftState::new("B", lat2, lon2, 3000.0).with_velocity(90.0, 200.0, 0.0),
        ]);
        let output = run(&traffic);
        assert!(output.confpairs.is_empty());
        assert!(output.lospairs.is_empty());
    }

    #[test]
    fn close_stationary_pair_is_loss_of_separation() {
        let (lat2, lon2) = offset_by_bearing(52.0, 4.0, 1.0 * NM, 0.0);
        let traffic = TrafficSnapshot::new(vec![
            AircraftState::new("A", 52.0, 4.0, 3000.0),
            AircraftState::new("B", lat2, lon2, 3100.0),
            AircraftState::new("C", 53.0, 4.0, 3000.0),
        ]);
        let output = run(&traffic);
        assert_eq!(output.lospairs, vec![(0, 1), (1, 0)]);
        assert_eq!(output.confpairs, vec![(0, 1), (1, 0)]);
        assert_eq!(output.inconf, vec![true, true, false]);
        assert!(output.tcpa.iter().all(|t| t.is_finite()));
    }

    #[test]
    fn per_aircraft_radius_uses_larger_zone() {
        let (lat2, lon2) = offset_by_bearing(52.0, 4.0, 6.0 * NM, 0.0);
        let traffic = TrafficSnapshot::new(vec![
            AircraftState::new("A", 52.0, 4.0, 3000.0),
            AircraftState::new("B", lat2, lon2, 3000.0),
        ]);
        let output = StateBased.detect(
            &traffic,
            &traffic,
            &[RPZ, 7.0 * NM],
            &[HPZ, HPZ],
            &[300.0, 300.0],
        );
        assert_eq!(output.lospairs, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn copied_intruder_set_skips_self_pairs() {
        let (lat2, lon2) = offset_by_bearing(52.0, 4.0, 1.0 * NM, 0.0);
        let own = TrafficSnapshot::new(vec![
            AircraftState::new("A", 52.0, 4.0, 3000.0),
            AircraftState::new("B", lat2, lon2, 3000.0),
        ]);
        let intruders = own.clone();
        let output = StateBased.detect(&own, &intruders, &[RPZ; 2], &[HPZ; 2], &[300.0; 2]);

        assert_eq!(output.confpairs, vec![(0, 1), (1, 0)]);
        assert_eq!(output.lospairs, vec![(0, 1), (1, 0)]);
        assert!(output.confpairs.iter().all(|&(i, j)| i != j));
    }

    #[test]
    fn separate_intruder_set_keeps_self_pairs() {
        let own = head_on(20.0, 3000.0);
        let intruders = TrafficSnapshot::new(vec![own.aircraft()[1].clone()]);
        let output = StateBased.detect(&own, &intruders, &[RPZ; 2], &[HPZ; 2], &[300.0; 2]);

        // Slot 1 of the ownship set is the same aircraft as intruder 0
        assert_eq!(output.confpairs, vec![(0, 0), (1, 0)]);
        assert_eq!(output.lospairs, vec![(1, 0)]);
        assert_eq!(output.inconf, vec![true, true]);
    }
}
