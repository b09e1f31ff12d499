//! Unit tests for ssd-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, ObjectId, TargetId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(TargetId::from(ObjectId(3)).to_string(), "ObjectId(3)");
    }

    #[test]
    fn agents_order_before_objects() {
        let a = TargetId::Agent(AgentId(1000));
        let o = TargetId::Object(ObjectId(0));
        assert!(a < o);
        assert!(TargetId::Agent(AgentId(1)) < TargetId::Agent(AgentId(2)));
    }

    #[test]
    fn stream_keys_do_not_collide() {
        let a = TargetId::Agent(AgentId(5)).stream_key();
        let o = TargetId::Object(ObjectId(5)).stream_key();
        assert_ne!(a, o);
    }

    #[test]
    fn agent_accessor() {
        assert_eq!(TargetId::Agent(AgentId(2)).agent(), Some(AgentId(2)));
        assert_eq!(TargetId::Object(ObjectId(2)).agent(), None);
    }
}

#[cfg(test)]
mod geo {
    use crate::Position;

    #[test]
    fn distance_is_euclidean() {
        let d = Position::new(0.0, 0.0).distance(Position::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn step_toward_does_not_overshoot() {
        let p = Position::new(0.0, 0.0).step_toward(Position::new(0.5, 0.0), 1.0);
        assert_eq!(p, Position::new(0.5, 0.0));

        let q = Position::new(0.0, 0.0).step_toward(Position::new(10.0, 0.0), 1.0);
        assert!((q.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn step_away_increases_distance() {
        let threat = Position::new(1.0, 1.0);
        let start = Position::new(2.0, 1.0);
        let next = start.step_away(threat, 1.5);
        assert!(next.distance(threat) > start.distance(threat));
    }

    #[test]
    fn step_away_from_own_position() {
        let p = Position::new(1.0, 1.0);
        assert_eq!(p.step_away(p, 2.0), Position::new(3.0, 1.0));
    }

    #[test]
    fn non_finite_detected() {
        assert!(!Position::new(f32::NAN, 0.0).is_finite());
        assert!(Position::new(1.0, -1.0).is_finite());
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        assert_eq!(Tick(10) + 5, Tick(15));
        assert_eq!(Tick(15).since(Tick(10)), 5);
        assert_eq!(Tick(3).since(Tick(10)), 0);
        assert_eq!(Tick(3).next(), Tick(4));
        assert_eq!(Tick(7).to_string(), "T7");
    }

    #[test]
    fn clock_advances_one_tick_at_a_time() {
        let mut clock = SimClock::new();
        for _ in 0..26 {
            clock.advance();
        }
        assert_eq!(clock.current_tick, Tick(26));
    }

    #[test]
    fn sim_config_end_tick() {
        let cfg = SimConfig { total_ticks: 100, ..SimConfig::default() };
        assert_eq!(cfg.end_tick(), Tick(100));
        assert_eq!(cfg.make_clock().current_tick, Tick::ZERO);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, SimRng, Tick};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = AgentRng::new(42, AgentId(7));
        let mut b = AgentRng::new(42, AgentId(7));
        for _ in 0..16 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn different_agents_diverge() {
        let mut a = AgentRng::new(42, AgentId(0));
        let mut b = AgentRng::new(42, AgentId(1));
        let va: Vec<u64> = (0..4).map(|_| a.random()).collect();
        let vb: Vec<u64> = (0..4).map(|_| b.random()).collect();
        assert_ne!(va, vb);
    }

    #[test]
    fn stream_rng_depends_only_on_inputs() {
        let x = SimRng::for_stream(9, Tick(5), 77).random::<u64>();
        let y = SimRng::for_stream(9, Tick(5), 77).random::<u64>();
        let z = SimRng::for_stream(9, Tick(6), 77).random::<u64>();
        assert_eq!(x, y);
        assert_ne!(x, z);
    }

    #[test]
    fn gen_bool_clamps() {
        let mut r = SimRng::new(1);
        assert!(r.gen_bool(2.0));
        assert!(!r.gen_bool(-1.0));
    }

    #[test]
    fn choose_empty_is_none() {
        let mut r = AgentRng::new(0, AgentId(0));
        let empty: [u8; 0] = [];
        assert!(r.choose(&empty).is_none());
    }
}

#[cfg(test)]
mod layer {
    use crate::{Layer, LayerVec};

    #[test]
    fn indexing_by_layer() {
        let mut v = LayerVec::ZERO;
        v[Layer::Core] = 2.0;
        assert_eq!(v.0, [0.0, 0.0, 2.0, 0.0]);
        assert_eq!(v[Layer::Core], 2.0);
    }

    #[test]
    fn dot_and_sum() {
        let a = LayerVec([1.0, 2.0, 3.0, 4.0]);
        let w = LayerVec([1.0, 0.0, 1.0, 0.5]);
        assert_eq!(a.sum(), 10.0);
        assert_eq!(a.dot(&w), 6.0);
    }

    #[test]
    fn dominant_picks_max_positive() {
        assert_eq!(LayerVec([0.1, 0.5, 0.2, 0.0]).dominant(), Some(Layer::Foundation));
        assert_eq!(LayerVec([0.3, 0.3, 0.0, 0.0]).dominant(), Some(Layer::Physical));
        assert_eq!(LayerVec::ZERO.dominant(), None);
        assert_eq!(LayerVec([-1.0, f32::NAN, 0.0, 0.0]).dominant(), None);
    }

    #[test]
    fn add_assign() {
        let mut a = LayerVec::splat(1.0);
        a += LayerVec([0.0, 1.0, 2.0, 3.0]);
        assert_eq!(a.0, [1.0, 2.0, 3.0, 4.0]);
    }
}

#[cfg(test)]
mod descriptor {
    use crate::{AgentId, Category, Descriptor, ObjectId, Position, RawDescriptor, TargetId};

    #[test]
    fn missing_identity_is_dropped() {
        let raw = RawDescriptor {
            position: Some(Position::new(0.0, 0.0)),
            ..RawDescriptor::default()
        };
        assert!(Descriptor::from_raw(&raw).is_none());
    }

    #[test]
    fn non_finite_position_is_dropped() {
        let raw = RawDescriptor::new(ObjectId(1), Category::Danger, Position::new(f32::INFINITY, 0.0));
        assert!(Descriptor::from_raw(&raw).is_none());
    }

    #[test]
    fn missing_optionals_default_to_neutral_values() {
        let raw = RawDescriptor {
            id:       Some(TargetId::Object(ObjectId(4))),
            position: Some(Position::new(1.0, 2.0)),
            ..RawDescriptor::default()
        };
        let d = Descriptor::from_raw(&raw).unwrap();
        assert_eq!(d.category, Category::Neutral);
        assert_eq!(d.magnitude, 1.0);
        assert_eq!(d.defense, 0.0);
        assert_eq!(d.owner, None);
    }

    #[test]
    fn malformed_magnitude_defaults() {
        for bad in [-2.0, f32::NAN, f32::INFINITY] {
            let raw = RawDescriptor::new(ObjectId(1), Category::Resource, Position::default())
                .with_magnitude(bad);
            assert_eq!(Descriptor::from_raw(&raw).unwrap().magnitude, 1.0);
        }
    }

    #[test]
    fn supplied_fields_survive() {
        let raw = RawDescriptor::new(ObjectId(2), Category::Prey, Position::new(3.0, 3.0))
            .with_magnitude(2.5)
            .with_defense(0.7)
            .with_owner(AgentId(1));
        let d = Descriptor::from_raw(&raw).unwrap();
        assert_eq!(d.magnitude, 2.5);
        assert_eq!(d.defense, 0.7);
        assert_eq!(d.owner, Some(AgentId(1)));
    }

    #[test]
    fn agent_descriptor_owns_itself() {
        let d = Descriptor::for_agent(AgentId(3), Position::new(1.0, 1.0));
        assert_eq!(d.id, TargetId::Agent(AgentId(3)));
        assert_eq!(d.category, Category::Agent);
        assert_eq!(d.owner, Some(AgentId(3)));
    }
}

#[cfg(test)]
mod config {
    use crate::{SsdConfig, SsdError};

    fn field_of(err: SsdError) -> &'static str {
        match err {
            SsdError::Config { field, .. } => field,
            other => panic!("expected config error, got {other}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        SsdConfig::default().validate().unwrap();
    }

    #[test]
    fn negative_decay_rejected() {
        let mut cfg = SsdConfig::default();
        cfg.coherence.decay = -0.1;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "coherence.decay");
    }

    #[test]
    fn zero_epsilon_rejected() {
        let mut cfg = SsdConfig::default();
        cfg.coherence.epsilon = 0.0;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "coherence.epsilon");
    }

    #[test]
    fn baseline_below_floor_rejected() {
        let mut cfg = SsdConfig::default();
        cfg.coherence.baseline = 0.001;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "coherence.baseline");
    }

    #[test]
    fn hysteresis_gap_required() {
        let mut cfg = SsdConfig::default();
        cfg.boundary.evict_threshold = cfg.boundary.merge_threshold;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "boundary.evict_threshold");
    }

    #[test]
    fn zero_windows_rejected() {
        let mut cfg = SsdConfig::default();
        cfg.boundary.sustain_ticks = 0;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "boundary.sustain_ticks");
    }

    #[test]
    fn inverted_temperament_range_rejected() {
        let mut cfg = SsdConfig::default();
        cfg.drives.temperament_min = 0.8;
        cfg.drives.temperament_max = 0.2;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "drives.temperament_min");
    }

    #[test]
    fn sharing_and_shelter_bounds_checked() {
        let mut cfg = SsdConfig::default();
        cfg.hunting.share_fraction = 1.5;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "hunting.share_fraction");

        let mut cfg = SsdConfig::default();
        cfg.hunting.share_radius = -1.0;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "hunting.share_radius");

        let mut cfg = SsdConfig::default();
        cfg.alignment.shelter_fear = f32::NAN;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "alignment.shelter_fear");
    }

    #[test]
    fn nan_rejected() {
        let mut cfg = SsdConfig::default();
        cfg.leap.threshold = f32::NAN;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "leap.threshold");
    }

    #[test]
    fn error_message_names_field() {
        let mut cfg = SsdConfig::default();
        cfg.propagation.falloff = 0.0;
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("propagation.falloff"), "got {msg}");
    }
}
