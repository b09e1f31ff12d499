//! The coherence store: κ per (agent, target).
//!
//! κ is memory strength, not valence.  It rises with reinforcing outcomes,
//! falls with adverse ones, and slowly relaxes toward the floor when nothing
//! happens.  It is always in `[ε, κ_max]`.
//!
//! Storage is one sparse map per agent slot, so removing an agent is a
//! single `clear()`.  A relation lives until its owner is removed; once
//! created it never reads as the baseline again.

use rustc_hash::FxHashMap;

use ssd_core::{AgentId, CoherenceConfig, TargetId, Tick};

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// What happened between an agent and a target.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutcomeKind {
    /// Successful joint action (hunt, shared contact).
    Cooperated,
    /// Food gathered safely.
    ResourceAcquired,
    /// Got away from a threat.
    Escaped,
    /// Peaceful social contact.
    Encountered,
    /// Hurt by the target.
    Attacked,
    /// A hunt together failed.
    HuntFailed,
    /// The resource was gone or taken first.
    ResourceLost,
}

impl OutcomeKind {
    pub fn is_reinforcing(self) -> bool {
        matches!(
            self,
            OutcomeKind::Cooperated
                | OutcomeKind::ResourceAcquired
                | OutcomeKind::Escaped
                | OutcomeKind::Encountered
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Cooperated       => "cooperated",
            OutcomeKind::ResourceAcquired => "resource_acquired",
            OutcomeKind::Escaped          => "escaped",
            OutcomeKind::Encountered      => "encountered",
            OutcomeKind::Attacked         => "attacked",
            OutcomeKind::HuntFailed       => "hunt_failed",
            OutcomeKind::ResourceLost     => "resource_lost",
        }
    }
}

/// An outcome with a strength in `[0, 1]`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Outcome {
    pub kind:     OutcomeKind,
    pub strength: f32,
}

impl Outcome {
    pub fn new(kind: OutcomeKind, strength: f32) -> Self {
        let strength = if strength.is_finite() { strength.clamp(0.0, 1.0) } else { 0.0 };
        Self { kind, strength }
    }

    /// Full-strength outcome.
    pub fn full(kind: OutcomeKind) -> Self {
        Self::new(kind, 1.0)
    }
}

// ── CoherenceStore ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct Bond {
    kappa:   f32,
    touched: Tick,
}

/// κ for every (agent, target) pair an agent has interacted with.
pub struct CoherenceStore {
    cfg:   CoherenceConfig,
    slots: Vec<FxHashMap<TargetId, Bond>>,
}

impl CoherenceStore {
    pub fn new(cfg: CoherenceConfig, agents: usize) -> Self {
        Self {
            cfg,
            slots: (0..agents).map(|_| FxHashMap::default()).collect(),
        }
    }

    pub fn config(&self) -> &CoherenceConfig {
        &self.cfg
    }

    /// Make room for agent slots up to and including `agent`.
    pub fn ensure_agent(&mut self, agent: AgentId) {
        if self.slots.len() <= agent.index() {
            self.slots.resize_with(agent.index() + 1, FxHashMap::default);
        }
    }

    /// κ(agent → target).  Unseen pairs report the baseline.
    #[inline]
    pub fn get(&self, agent: AgentId, target: TargetId) -> f32 {
        self.slots
            .get(agent.index())
            .and_then(|m| m.get(&target))
            .map_or(self.cfg.baseline, |b| b.kappa)
    }

    /// `true` if the relation exists (has been created by an update).
    pub fn contains(&self, agent: AgentId, target: TargetId) -> bool {
        self.slots.get(agent.index()).is_some_and(|m| m.contains_key(&target))
    }

    /// Mean of κ(a → b) and κ(b → a).
    pub fn mutual(&self, a: AgentId, b: AgentId) -> f32 {
        0.5 * (self.get(a, TargetId::Agent(b)) + self.get(b, TargetId::Agent(a)))
    }

    /// Apply one outcome:
    ///
    /// `κ ← clamp(κ·decay ± rate·strength, ε, κ_max)`
    ///
    /// where `rate` is `gain` for reinforcing outcomes and `penalty` for
    /// adverse ones.  Returns the new κ.
    pub fn update(&mut self, agent: AgentId, target: TargetId, outcome: Outcome, tick: Tick) -> f32 {
        self.ensure_agent(agent);
        let c = &self.cfg;
        let old = self.get(agent, target);
        let delta = if outcome.kind.is_reinforcing() {
            c.gain * outcome.strength
        } else {
            -c.penalty * outcome.strength
        };
        let new = (old * c.decay + delta).clamp(c.epsilon, c.kappa_max);
        self.slots[agent.index()].insert(target, Bond { kappa: new, touched: tick });
        new
    }

    /// Relax every relation not updated during `tick`.
    pub fn idle_decay(&mut self, tick: Tick) {
        let (eps, k) = (self.cfg.epsilon, self.cfg.idle_decay);
        for slot in &mut self.slots {
            for bond in slot.values_mut() {
                if bond.touched != tick {
                    bond.kappa = (bond.kappa * k).max(eps);
                }
            }
        }
    }

    /// Drop every relation `agent` owns.
    pub fn remove_agent(&mut self, agent: AgentId) {
        if let Some(slot) = self.slots.get_mut(agent.index()) {
            slot.clear();
        }
    }

    /// Number of relations `agent` owns.
    pub fn relation_count(&self, agent: AgentId) -> usize {
        self.slots.get(agent.index()).map_or(0, |m| m.len())
    }

    /// All relations of `agent`, sorted by target.
    pub fn relations(&self, agent: AgentId) -> Vec<(TargetId, f32)> {
        let mut out: Vec<(TargetId, f32)> = self
            .slots
            .get(agent.index())
            .map(|m| m.iter().map(|(t, b)| (*t, b.kappa)).collect())
            .unwrap_or_default();
        out.sort_unstable_by_key(|(t, _)| *t);
        out
    }

    /// Mean κ over all stored relations, or `None` if there are none.
    pub fn mean_kappa(&self) -> Option<f32> {
        let (sum, n) = self
            .slots
            .iter()
            .flat_map(|m| m.values())
            .fold((0.0f64, 0usize), |(s, n), b| (s + b.kappa as f64, n + 1));
        (n > 0).then(|| (sum / n as f64) as f32)
    }
}
