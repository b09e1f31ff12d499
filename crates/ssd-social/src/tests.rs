//! Unit tests for ssd-social.

use ssd_core::{AgentId, BoundaryConfig, Position, Tick};

use crate::{BoundaryEvent, BoundaryTracker};

fn at(x: f32) -> Position {
    Position::new(x, 0.0)
}

fn a(n: u32) -> AgentId {
    AgentId(n)
}

/// Run `ticks` updates starting at `start`, returning all events.
fn run(
    tracker: &mut BoundaryTracker,
    start:   u64,
    ticks:   u64,
    living:  &[(AgentId, Position)],
    kappa:   impl Fn(AgentId, AgentId) -> f32,
) -> Vec<BoundaryEvent> {
    let mut events = Vec::new();
    for t in start..start + ticks {
        events.extend(tracker.update(Tick(t), living, &kappa));
    }
    events
}

// ── Boundary formation ────────────────────────────────────────────────────────

#[cfg(test)]
mod boundary {
    use super::*;

    fn pair() -> Vec<(AgentId, Position)> {
        vec![(a(0), at(0.0)), (a(1), at(1.0))]
    }

    fn formed_pair() -> BoundaryTracker {
        let mut t = BoundaryTracker::new(BoundaryConfig::default());
        run(&mut t, 0, 3, &pair(), |_, _| 0.8);
        assert_eq!(t.len(), 1);
        t
    }

    #[test]
    fn forms_after_sustained_high_kappa() {
        let mut t = BoundaryTracker::new(BoundaryConfig::default());
        let living = pair();

        assert!(run(&mut t, 0, 2, &living, |_, _| 0.8).is_empty());
        assert!(t.is_empty());

        let events = t.update(Tick(2), &living, |_, _| 0.8);
        assert_eq!(events.len(), 1);
        let BoundaryEvent::Formed { id, members } = &events[0] else {
            panic!("expected formation, got {:?}", events[0]);
        };
        assert_eq!(members, &vec![a(0), a(1)]);
        assert_eq!(t.boundary_of(a(0)), Some(*id));
        assert_eq!(t.boundary_of(a(1)), Some(*id));
        assert_eq!(t.get(*id).map(|b| b.formed), Some(Tick(2)));
    }

    #[test]
    fn streak_resets_when_kappa_dips() {
        let mut t = BoundaryTracker::new(BoundaryConfig::default());
        let living = pair();
        run(&mut t, 0, 2, &living, |_, _| 0.8);
        t.update(Tick(2), &living, |_, _| 0.5);
        run(&mut t, 3, 2, &living, |_, _| 0.8);
        assert!(t.is_empty());
        t.update(Tick(5), &living, |_, _| 0.8);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn distant_agents_never_merge() {
        let mut t = BoundaryTracker::new(BoundaryConfig::default());
        let living = vec![(a(0), at(0.0)), (a(1), at(50.0))];
        run(&mut t, 0, 10, &living, |_, _| 1.0);
        assert!(t.is_empty());
    }

    #[test]
    fn dissolves_after_sustained_low_kappa() {
        let mut t = formed_pair();
        let living = pair();

        assert!(run(&mut t, 3, 2, &living, |_, _| 0.1).is_empty());
        assert_eq!(t.len(), 1);

        let events = t.update(Tick(5), &living, |_, _| 0.1);
        assert!(events.iter().any(|e| matches!(e, BoundaryEvent::Dissolved { .. })));
        assert!(t.is_empty());
        assert_eq!(t.boundary_of(a(0)), None);
        assert_eq!(t.boundary_of(a(1)), None);
    }

    #[test]
    fn kappa_between_thresholds_changes_nothing() {
        let mut t = formed_pair();
        let living = pair();
        for tick in 3..30u64 {
            let k = if tick % 2 == 0 { 0.25 } else { 0.55 };
            let events = t.update(Tick(tick), &living, |_, _| k);
            assert!(events.is_empty(), "tick {tick}: {events:?}");
        }
        assert_eq!(t.len(), 1);
        assert!(t.boundaries().all(|b| b.members == vec![a(0), a(1)]));
    }

    #[test]
    fn membership_is_exclusive() {
        // 0–1 and 1–2 are co-located, 0–2 are not.
        let mut t = BoundaryTracker::new(BoundaryConfig::default());
        let living = vec![(a(0), at(0.0)), (a(1), at(2.0)), (a(2), at(4.0))];

        for tick in 0..10u64 {
            t.update(Tick(tick), &living, |_, _| 0.8);
            for (agent, _) in &living {
                let holders = t.boundaries().filter(|b| b.contains(*agent)).count();
                assert!(holders <= 1, "{agent} in {holders} boundaries");
            }
        }
        assert_eq!(t.len(), 1);
        let b = t.boundaries().next().map(|b| b.members.clone());
        assert_eq!(b, Some(vec![a(0), a(1), a(2)]));
    }

    #[test]
    fn singleton_joins_existing_boundary() {
        let mut t = formed_pair();
        let living = vec![(a(0), at(0.0)), (a(1), at(1.0)), (a(2), at(2.0))];
        let events = run(&mut t, 3, 3, &living, |_, _| 0.8);
        assert!(events.iter().any(|e| matches!(e, BoundaryEvent::Joined { agent, .. } if *agent == a(2))));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn two_boundaries_merge_into_lower_id() {
        let mut t = BoundaryTracker::new(BoundaryConfig::default());
        let west = vec![(a(0), at(0.0)), (a(1), at(1.0))];
        let east = vec![(a(2), at(40.0)), (a(3), at(41.0))];
        let apart: Vec<_> = west.iter().chain(east.iter()).copied().collect();
        run(&mut t, 0, 3, &apart, |_, _| 0.8);
        assert_eq!(t.len(), 2);

        let together = vec![(a(0), at(0.0)), (a(1), at(1.0)), (a(2), at(2.0)), (a(3), at(3.0))];
        let events = run(&mut t, 3, 3, &together, |_, _| 0.8);
        let merged = events.iter().find_map(|e| match e {
            BoundaryEvent::Merged { into, absorbed } => Some((*into, *absorbed)),
            _ => None,
        });
        let (into, absorbed) = merged.expect("boundaries should merge");
        assert!(into < absorbed);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(into).map(|b| b.members.len()), Some(4));
        assert!(t.get(absorbed).is_none());
    }

    #[test]
    fn drifting_member_is_evicted() {
        let mut t = BoundaryTracker::new(BoundaryConfig::default());
        let living = vec![(a(0), at(0.0)), (a(1), at(1.0)), (a(2), at(2.0))];
        run(&mut t, 0, 6, &living, |_, _| 0.8);
        assert_eq!(t.boundaries().next().map(|b| b.members.len()), Some(3));

        // Agent 2 falls out with everyone; 0 and 1 stay close.
        let kappa = |x: AgentId, y: AgentId| if x == a(2) || y == a(2) { 0.0 } else { 0.9 };
        let events = run(&mut t, 6, 3, &living, kappa);
        assert!(events.contains(&BoundaryEvent::Evicted { id: ssd_core::BoundaryId(0), agent: a(2) }));
        assert_eq!(t.boundary_of(a(2)), None);
        assert!(t.boundary_of(a(0)).is_some());
    }

    #[test]
    fn dead_member_dissolves_pair() {
        let mut t = formed_pair();
        let events = t.update(Tick(3), &[(a(0), at(0.0))], |_, _| 0.8);
        assert!(events.iter().any(|e| matches!(e, BoundaryEvent::Dissolved { .. })));
        assert!(t.is_empty());
    }
}

// ── Hunting ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod hunting {
    use ssd_agent::PressureAccumulator;
    use ssd_behavior::{Action, Decision};
    use ssd_core::{
        Category, Descriptor, HuntingConfig, LayerVec, ObjectId, RawDescriptor, TargetId,
    };

    use super::*;
    use crate::{HuntRegistry, Hunter, hunters_from};

    const PREY: TargetId = TargetId::Object(ObjectId(7));

    fn prey_at(x: f32, defense: f32) -> Descriptor {
        let raw = RawDescriptor::new(ObjectId(7), Category::Prey, at(x))
            .with_magnitude(2.0)
            .with_defense(defense);
        Descriptor::from_raw(&raw).unwrap()
    }

    fn hunter(n: u32, x: f32) -> Hunter {
        Hunter { agent: a(n), prey: PREY, score: 1.0, position: at(x) }
    }

    /// A configuration where every strike succeeds.
    fn certain() -> HuntingConfig {
        HuntingConfig { max_success: 1.0, half_strength: 0.0, ..HuntingConfig::default() }
    }

    #[test]
    fn probability_rises_with_group_strength() {
        let r = HuntRegistry::new(HuntingConfig::default());
        let base = r.success_probability(1, 1.0, 0.0, 1.0);
        assert!(r.success_probability(2, 1.0, 0.0, 1.0) > base);
        assert!(r.success_probability(1, 2.0, 0.0, 1.0) > base);
        assert!(r.success_probability(2, 1.0, 0.8, 1.0) > r.success_probability(2, 1.0, 0.2, 1.0));
        assert!(r.success_probability(1, 1.0, 0.0, 3.0) < base);
        assert!(r.success_probability(50, 50.0, 50.0, 0.0) <= r.config().max_success);
        assert_eq!(r.success_probability(0, 1.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn low_scores_do_not_participate() {
        let mut r = HuntRegistry::new(HuntingConfig::default());
        let weak = Hunter { score: 0.01, ..hunter(0, 20.0) };
        let report = r.step(Tick(0), 1, &[weak], |_| Some(prey_at(0.0, 0.0)), |_, _| 0.0);
        assert_eq!(report.formed, 0);
        assert!(r.groups().is_empty());
    }

    #[test]
    fn participation_and_cooperation_thresholds_are_exclusive() {
        let cfg = HuntingConfig::default();
        let mut r = HuntRegistry::new(cfg.clone());
        let borderline = Hunter { score: cfg.min_participation, ..hunter(0, 20.0) };
        let report = r.step(Tick(0), 1, &[borderline], |_| Some(prey_at(0.0, 0.0)), |_, _| 0.0);
        assert_eq!(report.formed, 0);

        let hunters = [hunter(0, 10.0), hunter(1, 11.0)];
        let at_threshold = cfg.cooperation_threshold;
        let report = r.step(Tick(1), 1, &hunters, |_| Some(prey_at(0.0, 0.0)), move |_, _| at_threshold);
        assert_eq!(report.formed, 2);
        assert!(r.groups().iter().all(|g| !g.is_cooperative()));
    }

    #[test]
    fn coherent_hunters_share_a_group() {
        let mut r = HuntRegistry::new(HuntingConfig::default());
        let hunters = [hunter(0, 10.0), hunter(1, 11.0)];
        let report = r.step(Tick(0), 1, &hunters, |_| Some(prey_at(0.0, 0.0)), |_, _| 0.8);
        assert_eq!(report.formed, 1);
        assert_eq!(report.active, 1);
        assert!(r.groups()[0].is_cooperative());
        assert_eq!(r.groups()[0].members, vec![a(0), a(1)]);
    }

    #[test]
    fn strangers_hunt_solo() {
        let mut r = HuntRegistry::new(HuntingConfig::default());
        let hunters = [hunter(0, 10.0), hunter(1, 11.0)];
        let report = r.step(Tick(0), 1, &hunters, |_| Some(prey_at(0.0, 0.0)), |_, _| 0.1);
        assert_eq!(report.formed, 2);
        assert!(r.groups().iter().all(|g| !g.is_cooperative()));
    }

    #[test]
    fn groups_persist_while_stalking() {
        let mut r = HuntRegistry::new(HuntingConfig::default());
        let hunters = [hunter(0, 10.0), hunter(1, 11.0)];
        r.step(Tick(0), 1, &hunters, |_| Some(prey_at(0.0, 0.0)), |_, _| 0.8);
        let id = r.groups()[0].id;

        // Agent 1 gives up; agent 0 keeps the group.
        let report = r.step(Tick(1), 1, &hunters[..1], |_| Some(prey_at(0.0, 0.0)), |_, _| 0.8);
        assert_eq!(report.formed, 0);
        assert_eq!(r.groups()[0].id, id);
        assert_eq!(r.groups()[0].members, vec![a(0)]);
    }

    #[test]
    fn vanished_prey_dissolves_group() {
        let mut r = HuntRegistry::new(HuntingConfig::default());
        let hunters = [hunter(0, 10.0)];
        r.step(Tick(0), 1, &hunters, |_| Some(prey_at(0.0, 0.0)), |_, _| 0.0);
        let report = r.step(Tick(1), 1, &hunters, |_| None, |_, _| 0.0);
        assert_eq!(report.lost.len(), 1);
        assert!(report.resolved.is_empty());
        assert!(r.groups().is_empty());
    }

    #[test]
    fn strike_is_deterministic_and_ends_group() {
        let hunters = [hunter(0, 0.5), hunter(1, 1.0)];
        let roll = || {
            let mut r = HuntRegistry::new(HuntingConfig::default());
            let report = r.step(Tick(3), 99, &hunters, |_| Some(prey_at(0.0, 1.0)), |_, _| 0.5);
            assert!(r.groups().is_empty());
            report
        };
        let first = roll();
        assert_eq!(first.resolved.len(), 1);
        assert_eq!(first, roll());
    }

    #[test]
    fn success_shares_food() {
        let mut r = HuntRegistry::new(certain());
        let hunters = [hunter(0, 0.5), hunter(1, 1.0)];
        let report = r.step(Tick(0), 5, &hunters, |_| Some(prey_at(0.0, 0.0)), |_, _| 0.8);
        let result = &report.resolved[0];
        assert!(result.success);
        assert_eq!(result.probability, 1.0);
        assert!((result.food_each - 1.0).abs() < 1e-6);
        assert_eq!(report.successes(), 1);
    }

    #[test]
    fn prey_is_captured_once() {
        let mut r = HuntRegistry::new(certain());
        let hunters = [hunter(0, 0.5), hunter(1, 1.0)];
        let report = r.step(Tick(0), 5, &hunters, |_| Some(prey_at(0.0, 0.0)), |_, _| 0.0);
        assert_eq!(report.successes(), 1);
        assert_eq!(report.resolved[0].members, vec![a(0)]);
        assert_eq!(report.lost.len(), 1);
    }

    #[test]
    fn hunters_read_from_decisions() {
        let idle = |n| Decision::idle(a(n), PressureAccumulator::default(), LayerVec::ZERO);
        let mut hunt = idle(1);
        hunt.action = Action::Hunt(PREY);
        hunt.score = 0.7;
        let positions = [at(0.0), at(3.0)];

        let hunters = hunters_from(&[idle(0), hunt], &positions);
        assert_eq!(hunters, vec![Hunter { agent: a(1), prey: PREY, score: 0.7, position: at(3.0) }]);
    }
}
