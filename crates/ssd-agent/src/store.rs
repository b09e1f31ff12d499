//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The compute phase needs `&mut AgentRngs` (each agent's own RNG) and
//! `&AgentStore` (shared read access to everyone's state) at the same time.
//! Keeping RNGs in a separate struct lets both borrows coexist:
//!
//! ```ignore
//! // ssd-sim compute phase (simplified):
//! let store: &AgentStore = &sim.store;
//! let decisions = sim.rngs.inner
//!     .par_iter_mut()
//!     .enumerate()
//!     .map(|(i, rng)| behavior.decide(AgentId(i as u32), &ctx, rng))
//!     .collect::<Vec<_>>();
//! ```

use ssd_core::{AgentId, AgentRng, BoundaryId, LayerVec, Position, Tick};

use crate::{Drives, Personality, PressureAccumulator, SuccessLog};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`] so the
/// compute phase can hold `&mut AgentRngs` and `&AgentStore` together.
#[derive(Clone)]
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
    seed:      u64,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner, seed: global_seed }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Seed an RNG for a newly born agent.  Its stream depends only on the
    /// global seed and its id, exactly like the initial population.
    pub fn push(&mut self, agent: AgentId) {
        debug_assert_eq!(agent.index(), self.inner.len());
        self.inner.push(AgentRng::new(self.seed, agent));
    }
}

// ── AgentSeed ─────────────────────────────────────────────────────────────────

/// Initial state for an agent appended after construction (a birth).
#[derive(Clone, Debug)]
pub struct AgentSeed {
    pub position:    Position,
    pub personality: Personality,
    pub weights:     LayerVec,
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them.  Dead agents keep their slot (with `alive` false)
/// so ids stay stable and are never reused.
pub struct AgentStore {
    /// Number of agent slots, living or dead.
    pub count: usize,

    pub alive: Vec<bool>,

    /// Tick the agent entered the simulation.
    pub born: Vec<Tick>,

    // ── Body ──────────────────────────────────────────────────────────────
    pub position: Vec<Position>,

    /// In `[0, 1]`.  Zero means death at the end of the commit phase.
    pub health: Vec<f32>,

    pub drives: Vec<Drives>,

    /// Fixed traits, each in `[0, 1]`.
    pub personality: Vec<Personality>,

    // ── Decision state ────────────────────────────────────────────────────
    /// Current (post-leap) layer weights.
    pub weights: Vec<LayerVec>,

    pub pressure: Vec<PressureAccumulator>,

    pub successes: Vec<SuccessLog>,

    // ── Social ────────────────────────────────────────────────────────────
    /// The boundary this agent belongs to.  At most one.
    pub boundary: Vec<Option<BoundaryId>>,
}

impl AgentStore {
    /// `true` if there are no agent slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order, dead included.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Iterator over living agents in ascending id order.
    pub fn living(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agent_ids().filter(|a| self.alive[a.index()])
    }

    #[inline]
    pub fn is_alive(&self, agent: AgentId) -> bool {
        self.alive.get(agent.index()).copied().unwrap_or(false)
    }

    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|a| **a).count()
    }

    /// Append one agent and return its id.
    pub fn push(&mut self, seed: AgentSeed, tick: Tick) -> AgentId {
        let id = AgentId(self.count as u32);
        self.count += 1;
        self.alive.push(true);
        self.born.push(tick);
        self.position.push(seed.position);
        self.health.push(1.0);
        self.drives.push(Drives::default());
        self.personality.push(seed.personality.clamped());
        self.weights.push(seed.weights);
        self.pressure.push(PressureAccumulator::default());
        self.successes.push(SuccessLog::default());
        self.boundary.push(None);
        id
    }

    /// Mark an agent dead and clear the state it owns.  Coherence relations
    /// and prediction tracks live elsewhere and are dropped by their owners.
    pub fn kill(&mut self, agent: AgentId) {
        let i = agent.index();
        if i >= self.count {
            return;
        }
        self.alive[i] = false;
        self.health[i] = 0.0;
        self.boundary[i] = None;
        self.pressure[i] = PressureAccumulator::default();
        self.successes[i].clear();
    }

    /// Reduce health by `amount`.  Returns `true` if the agent is now at 0.
    pub fn damage(&mut self, agent: AgentId, amount: f32) -> bool {
        let h = &mut self.health[agent.index()];
        if amount.is_finite() && amount > 0.0 {
            *h = (*h - amount).max(0.0);
        }
        *h <= 0.0
    }

    // ── Package-private constructor used by AgentStoreBuilder ─────────────

    pub(crate) fn new(count: usize, weights: LayerVec, personality: Vec<Personality>) -> Self {
        Self {
            count,
            alive:     vec![true; count],
            born:      vec![Tick::ZERO; count],
            position:  vec![Position::default(); count],
            health:    vec![1.0; count],
            drives:    vec![Drives::default(); count],
            personality,
            weights:   vec![weights; count],
            pressure:  vec![PressureAccumulator::default(); count],
            successes: vec![SuccessLog::default(); count],
            boundary:  vec![None; count],
        }
    }
}
