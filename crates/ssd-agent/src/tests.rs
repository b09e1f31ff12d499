//! Unit tests for ssd-agent.

#[cfg(test)]
mod store {
    use ssd_core::{AgentId, BoundaryId, LayerVec, Position, Tick};

    use crate::{AgentSeed, AgentStoreBuilder, Personality};

    #[test]
    fn arrays_have_count_elements() {
        let (store, rngs) = AgentStoreBuilder::new(5, 1).build();
        assert_eq!(store.count, 5);
        assert_eq!(store.alive.len(), 5);
        assert_eq!(store.position.len(), 5);
        assert_eq!(store.weights.len(), 5);
        assert_eq!(store.boundary.len(), 5);
        assert_eq!(rngs.len(), 5);
        assert_eq!(store.alive_count(), 5);
    }

    #[test]
    fn kill_clears_owned_state() {
        let (mut store, _) = AgentStoreBuilder::new(3, 1).build();
        store.boundary[1] = Some(BoundaryId(0));
        store.pressure[1].unresolved = 2.0;
        store.kill(AgentId(1));
        assert!(!store.is_alive(AgentId(1)));
        assert_eq!(store.boundary[1], None);
        assert_eq!(store.pressure[1].unresolved, 0.0);
        assert_eq!(store.living().collect::<Vec<_>>(), vec![AgentId(0), AgentId(2)]);
    }

    #[test]
    fn out_of_range_is_not_alive() {
        let (store, _) = AgentStoreBuilder::new(1, 1).build();
        assert!(!store.is_alive(AgentId(9)));
    }

    #[test]
    fn push_appends_slot() {
        let (mut store, mut rngs) = AgentStoreBuilder::new(2, 1).build();
        let id = store.push(
            AgentSeed {
                position:    Position::new(5.0, 5.0),
                personality: Personality::new(0.3, 1.4, f32::NAN, 0.9),
                weights:     LayerVec::splat(1.0),
            },
            Tick(10),
        );
        rngs.push(id);
        assert_eq!(id, AgentId(2));
        assert_eq!(store.count, 3);
        assert_eq!(store.born[2], Tick(10));
        assert_eq!(store.position[2], Position::new(5.0, 5.0));
        assert_eq!(store.personality[2], Personality::new(0.3, 1.0, Personality::NEUTRAL, 0.9));
        assert_eq!(rngs.len(), 3);
    }

    #[test]
    fn damage_reports_death() {
        let (mut store, _) = AgentStoreBuilder::new(1, 1).build();
        assert!(!store.damage(AgentId(0), 0.4));
        assert!(!store.damage(AgentId(0), f32::NAN));
        assert!(store.damage(AgentId(0), 0.7));
        assert_eq!(store.health[0], 0.0);
    }
}

#[cfg(test)]
mod builder {
    use ssd_core::LayerVec;

    use crate::{AgentStoreBuilder, Personality};

    #[test]
    fn weights_applied_to_all() {
        let w = LayerVec([0.5, 1.5, 1.0, 1.0]);
        let (store, _) = AgentStoreBuilder::new(3, 0).weights(w).build();
        assert!(store.weights.iter().all(|x| *x == w));
    }

    #[test]
    fn curiosity_within_range_and_deterministic() {
        let (a, _) = AgentStoreBuilder::new(20, 7).curiosity_range(0.2, 0.6).build();
        let (b, _) = AgentStoreBuilder::new(20, 7).curiosity_range(0.2, 0.6).build();
        assert_eq!(a.personality, b.personality);
        assert!(a.personality.iter().all(|p| (0.2..=0.6).contains(&p.curiosity)));
    }

    #[test]
    fn degenerate_range_is_constant() {
        let (store, _) = AgentStoreBuilder::new(4, 7).curiosity_range(0.3, 0.3).build();
        assert!(store.personality.iter().all(|p| p.curiosity == 0.3));
    }

    #[test]
    fn temperament_defaults_to_neutral() {
        let (store, _) = AgentStoreBuilder::new(3, 7).build();
        assert!(store.personality.iter().all(|p| *p == Personality::curious(0.0)));
        assert_eq!(store.personality[0].social_drive(), 1.0);
        assert_eq!(store.personality[0].caution(), 1.0);
    }

    #[test]
    fn temperament_drawn_per_trait() {
        let (store, _) = AgentStoreBuilder::new(30, 7).temperament_range(0.1, 0.9).build();
        let in_range = |v: f32| (0.1..=0.9).contains(&v);
        assert!(store.personality.iter().all(|p| {
            in_range(p.sociability) && in_range(p.risk_tolerance) && in_range(p.empathy)
        }));
        assert!(store.personality.iter().any(|p| p.sociability != p.empathy));
    }

    #[test]
    fn presets_cycle_and_override_ranges() {
        let (store, _) = AgentStoreBuilder::new(5, 7)
            .curiosity_range(0.0, 0.1)
            .presets(&[Personality::HEALER, Personality::LONER])
            .build();
        assert_eq!(store.personality[0], Personality::HEALER);
        assert_eq!(store.personality[1], Personality::LONER);
        assert_eq!(store.personality[4], Personality::HEALER);
    }

    #[test]
    fn trait_multipliers_span_half_to_one_and_a_half() {
        let shy = Personality::new(0.0, 0.0, 1.0, 0.0);
        let bold = Personality::new(0.0, 1.0, 0.0, 0.0);
        assert_eq!(shy.social_drive(), 0.5);
        assert_eq!(shy.caution(), 0.5);
        assert_eq!(bold.social_drive(), 1.5);
        assert_eq!(bold.caution(), 1.5);
    }
}

#[cfg(test)]
mod drives {
    use ssd_core::DriveConfig;

    use crate::{Activity, Drives};

    #[test]
    fn hunger_rises_and_saturates() {
        let cfg = DriveConfig { hunger_rate: 0.4, ..DriveConfig::default() };
        let mut d = Drives::default();
        d.tick(&cfg, Activity::Still);
        d.tick(&cfg, Activity::Still);
        d.tick(&cfg, Activity::Still);
        assert_eq!(d.hunger, 1.0);
        assert!(d.is_starving());
    }

    #[test]
    fn resting_recovers_fatigue() {
        let cfg = DriveConfig::default();
        let mut d = Drives { fatigue: 0.5, ..Drives::default() };
        d.tick(&cfg, Activity::Resting);
        assert!((d.fatigue - (0.5 - cfg.rest_recovery)).abs() < 1e-6);
        d.tick(&cfg, Activity::Moving);
        assert!((d.fatigue - (0.5 - cfg.rest_recovery + cfg.fatigue_rate)).abs() < 1e-6);
    }

    #[test]
    fn fear_decays_and_startles() {
        let cfg = DriveConfig::default();
        let mut d = Drives::default();
        d.startle(&cfg, 1.0);
        assert!((d.fear - cfg.fear_on_attack).abs() < 1e-6);
        d.tick(&cfg, Activity::Still);
        assert!((d.fear - cfg.fear_on_attack * cfg.fear_decay).abs() < 1e-6);
    }

    #[test]
    fn eating_never_goes_negative() {
        let cfg = DriveConfig::default();
        let mut d = Drives { hunger: 0.1, ..Drives::default() };
        d.eat(&cfg, 10.0);
        assert_eq!(d.hunger, 0.0);
    }

    #[test]
    fn socialize_clears_loneliness() {
        let mut d = Drives { loneliness: 0.8, ..Drives::default() };
        d.socialize();
        assert_eq!(d.loneliness, 0.0);
    }
}

#[cfg(test)]
mod pressure {
    use ssd_core::{AgentId, Layer, LayerVec, ObjectId, TargetId, Tick};

    use crate::{PressureAccumulator, SuccessLog};

    #[test]
    fn defer_attributes_to_layer() {
        let mut p = PressureAccumulator::default();
        p.defer(0.5, Layer::Foundation);
        p.defer(0.25, Layer::Upper);
        p.defer(-1.0, Layer::Core);
        p.defer(f32::NAN, Layer::Core);
        assert_eq!(p.unresolved, 0.75);
        assert_eq!(p.attribution[Layer::Foundation], 0.5);
        assert_eq!(p.attribution[Layer::Core], 0.0);
    }

    #[test]
    fn defer_profile_splits_proportionally() {
        let mut p = PressureAccumulator::default();
        p.defer_profile(1.0, &LayerVec([1.0, 3.0, 0.0, 0.0]));
        assert!((p.attribution[Layer::Physical] - 0.25).abs() < 1e-6);
        assert!((p.attribution[Layer::Foundation] - 0.75).abs() < 1e-6);
        assert_eq!(p.unresolved, 1.0);
    }

    #[test]
    fn reset_clears_attribution() {
        let mut p = PressureAccumulator::default();
        p.defer(2.0, Layer::Core);
        p.reset_unresolved();
        assert_eq!(p.unresolved, 0.0);
        assert_eq!(p.attribution, LayerVec::ZERO);
    }

    #[test]
    fn success_log_tracks_latest() {
        let mut log = SuccessLog::default();
        let berry = TargetId::Object(ObjectId(1));
        log.record(berry, Tick(3));
        log.record(berry, Tick(7));
        assert_eq!(log.last(berry), Some(Tick(7)));
        assert_eq!(log.len(), 1);
        assert_eq!(log.last(TargetId::Agent(AgentId(0))), None);
    }

    #[test]
    fn success_log_is_bounded() {
        let mut log = SuccessLog::default();
        for i in 0..(SuccessLog::CAPACITY as u32 + 3) {
            log.record(TargetId::Object(ObjectId(i)), Tick(i as u64));
        }
        assert_eq!(log.len(), SuccessLog::CAPACITY);
        assert_eq!(log.last(TargetId::Object(ObjectId(0))), None);
        assert!(log.last(TargetId::Object(ObjectId(10))).is_some());
    }
}
