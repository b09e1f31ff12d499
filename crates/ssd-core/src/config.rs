//! Model constants for the decision framework.
//!
//! `SsdConfig` is injected once at construction and is immutable for the
//! rest of the run.  Every field has a documented default; with the `serde`
//! feature a partial JSON file overrides only the values it names.
//!
//! [`SsdConfig::validate`] is the single place where a bad value becomes an
//! error.  Nothing inside a tick re-checks these domains.

use crate::{Category, Layer, LayerVec, SsdError, SsdResult};

// ── World ─────────────────────────────────────────────────────────────────────

/// Movement and perception geometry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Descriptors farther than this are invisible.  Default: 12.0.
    pub perception_radius: f32,
    /// Distance covered per tick by Forage / Hunt / Approach / Explore.  Default: 1.0.
    pub move_speed: f32,
    /// Distance covered per tick while fleeing.  Default: 1.5.
    pub flee_speed: f32,
    /// Range at which foraging, attacks and social contact take effect.  Default: 1.0.
    pub interact_radius: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            perception_radius: 12.0,
            move_speed:        1.0,
            flee_speed:        1.5,
            interact_radius:   1.0,
        }
    }
}

// ── Propagation ───────────────────────────────────────────────────────────────

/// Constants of the four-layer propagator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PropagationConfig {
    /// Distance at which raw stimulus is halved: `raw = m·g / (1 + d/falloff)`.
    pub falloff: f32,

    pub danger_gain:   f32,
    pub resource_gain: f32,
    pub prey_gain:     f32,
    pub neutral_gain:  f32,
    pub agent_gain:    f32,

    /// How strongly each layer responds to each category.
    pub danger_affinity:   LayerVec,
    pub resource_affinity: LayerVec,
    pub prey_affinity:     LayerVec,
    pub neutral_affinity:  LayerVec,
    pub agent_affinity:    LayerVec,

    /// Fraction of the residual passed from a layer to the next.  The Upper
    /// entry is unused (nothing lies above it).
    pub attenuation: LayerVec,

    /// Saturation ceiling `s_max` of `s_max·tanh(input/s_max)`.  Default: 2.0.
    pub saturation: f32,

    /// Local pressure above which a danger triggers a reflex flight.
    pub urgency_threshold: f32,

    /// Danger from inside the agent's own boundary is scaled by `1 − safety_bonus`.
    pub safety_bonus: f32,

    /// Danger from a rival boundary is scaled by `1 + threat_bonus`.
    pub threat_bonus: f32,
}

impl PropagationConfig {
    #[inline]
    pub fn gain(&self, category: Category) -> f32 {
        match category {
            Category::Danger   => self.danger_gain,
            Category::Resource => self.resource_gain,
            Category::Prey     => self.prey_gain,
            Category::Neutral  => self.neutral_gain,
            Category::Agent    => self.agent_gain,
        }
    }

    #[inline]
    pub fn affinity(&self, category: Category) -> &LayerVec {
        match category {
            Category::Danger   => &self.danger_affinity,
            Category::Resource => &self.resource_affinity,
            Category::Prey     => &self.prey_affinity,
            Category::Neutral  => &self.neutral_affinity,
            Category::Agent    => &self.agent_affinity,
        }
    }
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            falloff:           4.0,
            danger_gain:       1.5,
            resource_gain:     1.0,
            prey_gain:         1.0,
            neutral_gain:      0.2,
            agent_gain:        0.6,
            danger_affinity:   LayerVec([1.0, 1.0, 0.6, 0.4]),
            resource_affinity: LayerVec([0.6, 1.0, 0.8, 0.4]),
            prey_affinity:     LayerVec([0.6, 0.8, 1.0, 0.6]),
            neutral_affinity:  LayerVec([0.2, 0.2, 0.4, 0.6]),
            agent_affinity:    LayerVec([0.3, 0.4, 0.8, 1.0]),
            attenuation:       LayerVec([0.8, 0.7, 0.6, 1.0]),
            saturation:        2.0,
            urgency_threshold: 1.2,
            safety_bonus:      0.5,
            threat_bonus:      0.5,
        }
    }
}

// ── Coherence ─────────────────────────────────────────────────────────────────

/// Constants of the κ store.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoherenceConfig {
    /// κ reported for a target never interacted with.  Default: 0.1.
    pub baseline: f32,
    /// Floor ε: a relation is never fully forgotten.  Default: 0.01.
    pub epsilon: f32,
    /// Ceiling κ_max.  Default: 1.0.
    pub kappa_max: f32,
    /// Multiplier applied on every outcome update.  Default: 0.9.
    pub decay: f32,
    /// Added per unit strength of a reinforcing outcome.  Default: 0.1.
    pub gain: f32,
    /// Subtracted per unit strength of an adverse outcome.  Default: 0.05.
    pub penalty: f32,
    /// Per-tick multiplier for relations with no outcome that tick.  Default: 0.98.
    pub idle_decay: f32,
}

impl Default for CoherenceConfig {
    fn default() -> Self {
        Self {
            baseline:   0.1,
            epsilon:    0.01,
            kappa_max:  1.0,
            decay:      0.9,
            gain:       0.1,
            penalty:    0.05,
            idle_decay: 0.98,
        }
    }
}

// ── Prediction ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PredictionConfig {
    /// Samples kept per tracked target.  Default: 5.
    pub history_len: usize,
    /// A track not refreshed for this many ticks is dropped.  Default: 10.
    pub expiry_ticks: u64,
    /// Confidence ceiling.  Default: 0.9.
    pub max_confidence: f32,
    /// κ at which confidence reaches half its ceiling.  Default: 0.3.
    pub half_kappa: f32,
    /// Scale of anticipatory pressure.  Default: 0.5.
    pub gain: f32,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            history_len:    5,
            expiry_ticks:   10,
            max_confidence: 0.9,
            half_kappa:     0.3,
            gain:           0.5,
        }
    }
}

// ── Alignment ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AlignmentConfig {
    /// Layer weights every agent starts with.
    pub initial_weights: LayerVec,
    /// Scores closer than this are treated as tied.  Default: 1e-6.
    pub tie_epsilon: f32,
    /// Bonus per unit hunger on Forage and Hunt.
    pub hunger_bonus: f32,
    /// Bonus per unit fear on Flee.
    pub fear_bonus: f32,
    /// Bonus per unit fatigue on Rest.
    pub fatigue_bonus: f32,
    /// Bonus per unit curiosity on Explore.
    pub curiosity_bonus: f32,
    /// Bonus per unit loneliness on Approach.
    pub loneliness_bonus: f32,
    /// Fear above which a fleeing boundary member heads for its nearest
    /// ally.  Default: 0.3.
    pub shelter_fear: f32,
    /// How far a frightened agent looks for an ally.  Default: 15.0.
    pub shelter_radius: f32,
    /// Fraction of the deferred-pressure shortfall added to the unresolved
    /// accumulator.  Default: 0.1.
    pub deferral_rate: f32,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            initial_weights:  LayerVec([1.0, 1.0, 1.0, 1.0]),
            tie_epsilon:      1e-6,
            hunger_bonus:     0.6,
            fear_bonus:       0.5,
            fatigue_bonus:    0.5,
            curiosity_bonus:  0.2,
            loneliness_bonus: 0.3,
            shelter_fear:     0.3,
            shelter_radius:   15.0,
            deferral_rate:    0.1,
        }
    }
}

// ── Leap ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LeapConfig {
    /// Unresolved pressure above which a leap fires.  Default: 5.0.
    pub threshold: f32,
    /// Fraction of each non-dominant layer's weight moved to the dominant one.
    pub shift: f32,
    /// No layer weight is reduced below this.  Default: 0.05.
    pub min_weight: f32,
    /// Scale of unresolved pressure added by a failed escape, hunt or attack.
    pub failure_pressure: f32,
}

impl Default for LeapConfig {
    fn default() -> Self {
        Self {
            threshold:        5.0,
            shift:            0.2,
            min_weight:       0.05,
            failure_pressure: 0.5,
        }
    }
}

// ── Drives ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriveConfig {
    pub hunger_rate:       f32,
    /// Fatigue gained per tick spent moving.
    pub fatigue_rate:      f32,
    /// Fatigue recovered per tick spent resting.
    pub rest_recovery:     f32,
    /// Per-tick multiplier on fear.
    pub fear_decay:        f32,
    pub fear_on_attack:    f32,
    pub loneliness_rate:   f32,
    /// Hunger removed per unit of food magnitude eaten.
    pub food_value:        f32,
    /// Health lost per unit magnitude of an attack.
    pub attack_damage:     f32,
    /// Health lost per tick while hunger is saturated.
    pub starvation_damage: f32,
    /// Curiosity traits are drawn uniformly from this range at creation.
    pub curiosity_min:     f32,
    pub curiosity_max:     f32,
    /// Sociability, risk tolerance and empathy are each drawn uniformly
    /// from this range.  Default: 0.5 to 0.5, a neutral temperament.
    pub temperament_min:   f32,
    pub temperament_max:   f32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            hunger_rate:       0.01,
            fatigue_rate:      0.01,
            rest_recovery:     0.05,
            fear_decay:        0.9,
            fear_on_attack:    0.5,
            loneliness_rate:   0.005,
            food_value:        0.3,
            attack_damage:     0.2,
            starvation_damage: 0.02,
            curiosity_min:     0.0,
            curiosity_max:     0.5,
            temperament_min:   0.5,
            temperament_max:   0.5,
        }
    }
}

// ── Boundary ──────────────────────────────────────────────────────────────────

/// Territory formation thresholds.  `evict_threshold < merge_threshold`
/// is the hysteresis gap that keeps memberships from flapping.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoundaryConfig {
    pub colocation_radius:   f32,
    /// How many ticks a co-location counts toward candidacy.
    pub colocation_memory:   u64,
    /// Mutual κ needed for a co-located pair to become a candidate.
    pub candidate_threshold: f32,
    /// Mean cross κ needed to merge two units.
    pub merge_threshold:     f32,
    /// Consecutive ticks above `merge_threshold` before merging.
    pub sustain_ticks:       u32,
    /// Mean κ below which a member (or a whole boundary) starts to drift out.
    pub evict_threshold:     f32,
    /// Consecutive ticks below `evict_threshold` before eviction.
    pub evict_ticks:         u32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            colocation_radius:   3.0,
            colocation_memory:   5,
            candidate_threshold: 0.3,
            merge_threshold:     0.6,
            sustain_ticks:       3,
            evict_threshold:     0.2,
            evict_ticks:         3,
        }
    }
}

// ── Hunting ───────────────────────────────────────────────────────────────────

/// Cooperative hunting.  Success probability:
///
/// ```text
/// s = solo_strength + size_weight·(n−1) + score_weight·Σscore + kappa_weight·Σκ
/// p = max_success · s / (s + defense_weight·defense + half_strength)
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HuntingConfig {
    /// A Hunt counts as participation only when its score exceeds this.
    pub min_participation:     f32,
    /// Mutual κ a hunter must exceed with every member to join a group.
    pub cooperation_threshold: f32,
    pub strike_radius:         f32,
    pub max_success:           f32,
    pub solo_strength:         f32,
    pub size_weight:           f32,
    pub score_weight:          f32,
    pub kappa_weight:          f32,
    pub defense_weight:        f32,
    pub half_strength:         f32,
    /// Fraction of a hunter's portion an empathic hunter may hand to one
    /// hungry boundary member, scaled by its empathy.  Default: 0.5.
    pub share_fraction:        f32,
    /// A boundary member is fed only if its hunger exceeds this.
    pub share_hunger:          f32,
    /// Receivers must stand within this distance of the giver.
    pub share_radius:          f32,
}

impl Default for HuntingConfig {
    fn default() -> Self {
        Self {
            min_participation:     0.05,
            cooperation_threshold: 0.3,
            strike_radius:         1.5,
            max_success:           0.95,
            solo_strength:         1.0,
            size_weight:           1.0,
            score_weight:          0.5,
            kappa_weight:          1.0,
            defense_weight:        1.0,
            half_strength:         1.0,
            share_fraction:        0.5,
            share_hunger:          0.5,
            share_radius:          10.0,
        }
    }
}

// ── SsdConfig ─────────────────────────────────────────────────────────────────

/// All model constants, grouped by subsystem.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SsdConfig {
    pub world:       WorldConfig,
    pub propagation: PropagationConfig,
    pub coherence:   CoherenceConfig,
    pub prediction:  PredictionConfig,
    pub alignment:   AlignmentConfig,
    pub leap:        LeapConfig,
    pub drives:      DriveConfig,
    pub boundary:    BoundaryConfig,
    pub hunting:     HuntingConfig,
}

fn config_err(field: &'static str, reason: impl Into<String>) -> SsdError {
    SsdError::Config { field, reason: reason.into() }
}

fn positive(field: &'static str, v: f32) -> SsdResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(config_err(field, format!("must be finite and > 0, got {v}")))
    }
}

fn non_negative(field: &'static str, v: f32) -> SsdResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(config_err(field, format!("must be finite and >= 0, got {v}")))
    }
}

fn unit(field: &'static str, v: f32) -> SsdResult<()> {
    if v.is_finite() && (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(config_err(field, format!("must lie in [0, 1], got {v}")))
    }
}

fn non_negative_layers(field: &'static str, v: &LayerVec) -> SsdResult<()> {
    for layer in Layer::ALL {
        let x = v[layer];
        if !(x.is_finite() && x >= 0.0) {
            return Err(config_err(field, format!("{layer} entry must be finite and >= 0, got {x}")));
        }
    }
    Ok(())
}

fn nonzero(field: &'static str, v: u64) -> SsdResult<()> {
    if v == 0 {
        Err(config_err(field, "must be at least 1"))
    } else {
        Ok(())
    }
}

impl SsdConfig {
    /// Check every value against its domain.
    ///
    /// Returns the first violation found as [`SsdError::Config`].
    pub fn validate(&self) -> SsdResult<()> {
        let w = &self.world;
        positive("world.perception_radius", w.perception_radius)?;
        positive("world.move_speed", w.move_speed)?;
        positive("world.flee_speed", w.flee_speed)?;
        non_negative("world.interact_radius", w.interact_radius)?;

        let p = &self.propagation;
        positive("propagation.falloff", p.falloff)?;
        for category in Category::ALL {
            non_negative("propagation.*_gain", p.gain(category))?;
            non_negative_layers("propagation.*_affinity", p.affinity(category))?;
        }
        non_negative_layers("propagation.attenuation", &p.attenuation)?;
        for layer in Layer::ALL {
            unit("propagation.attenuation", p.attenuation[layer])?;
        }
        positive("propagation.saturation", p.saturation)?;
        positive("propagation.urgency_threshold", p.urgency_threshold)?;
        unit("propagation.safety_bonus", p.safety_bonus)?;
        non_negative("propagation.threat_bonus", p.threat_bonus)?;

        let c = &self.coherence;
        positive("coherence.epsilon", c.epsilon)?;
        positive("coherence.kappa_max", c.kappa_max)?;
        if c.epsilon > c.kappa_max {
            return Err(config_err("coherence.epsilon", "must not exceed kappa_max"));
        }
        if !(c.baseline.is_finite() && c.baseline >= c.epsilon && c.baseline <= c.kappa_max) {
            return Err(config_err(
                "coherence.baseline",
                format!("must lie in [epsilon, kappa_max], got {}", c.baseline),
            ));
        }
        unit("coherence.decay", c.decay)?;
        unit("coherence.idle_decay", c.idle_decay)?;
        non_negative("coherence.gain", c.gain)?;
        non_negative("coherence.penalty", c.penalty)?;

        let pr = &self.prediction;
        if pr.history_len < 2 {
            return Err(config_err("prediction.history_len", "must be at least 2"));
        }
        nonzero("prediction.expiry_ticks", pr.expiry_ticks)?;
        unit("prediction.max_confidence", pr.max_confidence)?;
        positive("prediction.half_kappa", pr.half_kappa)?;
        non_negative("prediction.gain", pr.gain)?;

        let a = &self.alignment;
        non_negative_layers("alignment.initial_weights", &a.initial_weights)?;
        if a.initial_weights.sum() <= 0.0 {
            return Err(config_err("alignment.initial_weights", "must not all be zero"));
        }
        non_negative("alignment.tie_epsilon", a.tie_epsilon)?;
        non_negative("alignment.hunger_bonus", a.hunger_bonus)?;
        non_negative("alignment.fear_bonus", a.fear_bonus)?;
        non_negative("alignment.fatigue_bonus", a.fatigue_bonus)?;
        non_negative("alignment.curiosity_bonus", a.curiosity_bonus)?;
        non_negative("alignment.loneliness_bonus", a.loneliness_bonus)?;
        unit("alignment.shelter_fear", a.shelter_fear)?;
        non_negative("alignment.shelter_radius", a.shelter_radius)?;
        non_negative("alignment.deferral_rate", a.deferral_rate)?;

        let l = &self.leap;
        positive("leap.threshold", l.threshold)?;
        unit("leap.shift", l.shift)?;
        non_negative("leap.min_weight", l.min_weight)?;
        non_negative("leap.failure_pressure", l.failure_pressure)?;

        let d = &self.drives;
        unit("drives.hunger_rate", d.hunger_rate)?;
        unit("drives.fatigue_rate", d.fatigue_rate)?;
        unit("drives.rest_recovery", d.rest_recovery)?;
        unit("drives.fear_decay", d.fear_decay)?;
        unit("drives.fear_on_attack", d.fear_on_attack)?;
        unit("drives.loneliness_rate", d.loneliness_rate)?;
        non_negative("drives.food_value", d.food_value)?;
        non_negative("drives.attack_damage", d.attack_damage)?;
        unit("drives.starvation_damage", d.starvation_damage)?;
        unit("drives.curiosity_min", d.curiosity_min)?;
        unit("drives.curiosity_max", d.curiosity_max)?;
        if d.curiosity_min > d.curiosity_max {
            return Err(config_err("drives.curiosity_min", "must not exceed curiosity_max"));
        }
        unit("drives.temperament_min", d.temperament_min)?;
        unit("drives.temperament_max", d.temperament_max)?;
        if d.temperament_min > d.temperament_max {
            return Err(config_err("drives.temperament_min", "must not exceed temperament_max"));
        }

        let b = &self.boundary;
        non_negative("boundary.colocation_radius", b.colocation_radius)?;
        nonzero("boundary.colocation_memory", b.colocation_memory)?;
        unit("boundary.candidate_threshold", b.candidate_threshold)?;
        unit("boundary.merge_threshold", b.merge_threshold)?;
        unit("boundary.evict_threshold", b.evict_threshold)?;
        if b.evict_threshold >= b.merge_threshold {
            return Err(config_err(
                "boundary.evict_threshold",
                format!(
                    "must be below merge_threshold ({} >= {})",
                    b.evict_threshold, b.merge_threshold
                ),
            ));
        }
        nonzero("boundary.sustain_ticks", b.sustain_ticks as u64)?;
        nonzero("boundary.evict_ticks", b.evict_ticks as u64)?;

        let h = &self.hunting;
        non_negative("hunting.min_participation", h.min_participation)?;
        unit("hunting.cooperation_threshold", h.cooperation_threshold)?;
        non_negative("hunting.strike_radius", h.strike_radius)?;
        unit("hunting.max_success", h.max_success)?;
        positive("hunting.solo_strength", h.solo_strength)?;
        non_negative("hunting.size_weight", h.size_weight)?;
        non_negative("hunting.score_weight", h.score_weight)?;
        non_negative("hunting.kappa_weight", h.kappa_weight)?;
        non_negative("hunting.defense_weight", h.defense_weight)?;
        positive("hunting.half_strength", h.half_strength)?;
        unit("hunting.share_fraction", h.share_fraction)?;
        unit("hunting.share_hunger", h.share_hunger)?;
        non_negative("hunting.share_radius", h.share_radius)?;

        Ok(())
    }
}
