//! Per-tick summaries and read-only state snapshots.

use ssd_agent::{AgentStore, Drives};
use ssd_behavior::{Action, ActionKind, CoherenceStore};
use ssd_core::{AgentId, BoundaryId, LayerVec, Position, Tick};
use ssd_social::{BoundaryTracker, HuntRegistry};

// ── TickReport ────────────────────────────────────────────────────────────────

/// Counters for one committed tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub tick:                 Tick,
    /// Living agents after the commit.
    pub alive:                usize,
    /// Chosen actions, indexed by [`ActionKind::index`].
    pub actions:              [usize; ActionKind::ALL.len()],
    pub leaps:                usize,
    pub boundaries:           usize,
    pub boundaries_formed:    usize,
    pub boundaries_dissolved: usize,
    pub hunts_resolved:       usize,
    pub hunts_succeeded:      usize,
    /// Portions handed from hunters to hungry boundary members.
    pub shares:               usize,
    pub deaths:               usize,
    /// Descriptors dropped as malformed.
    pub dropped_descriptors:  usize,
    pub mean_kappa:           Option<f32>,
}

impl TickReport {
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions[kind.index()]
    }
}

// ── SimSnapshot ───────────────────────────────────────────────────────────────

/// Read-only view of committed state, handed to observers.
pub struct SimSnapshot<'a> {
    /// The tick that just committed.
    pub tick:       Tick,
    pub agents:     &'a AgentStore,
    /// Last chosen action per agent slot.
    pub actions:    &'a [Action],
    pub coherence:  &'a CoherenceStore,
    pub boundaries: &'a BoundaryTracker,
    pub hunts:      &'a HuntRegistry,
}

/// One agent's reportable state.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentView {
    pub agent:      AgentId,
    pub position:   Position,
    pub health:     f32,
    pub drives:     Drives,
    pub weights:    LayerVec,
    pub unresolved: f32,
    pub leaps:      u32,
    pub boundary:   Option<BoundaryId>,
    pub action:     Action,
    pub relations:  usize,
}

impl<'a> SimSnapshot<'a> {
    pub fn agent(&self, agent: AgentId) -> Option<AgentView> {
        if !self.agents.is_alive(agent) {
            return None;
        }
        let i = agent.index();
        Some(AgentView {
            agent,
            position:   self.agents.position[i],
            health:     self.agents.health[i],
            drives:     self.agents.drives[i],
            weights:    self.agents.weights[i],
            unresolved: self.agents.pressure[i].unresolved,
            leaps:      self.agents.pressure[i].leaps,
            boundary:   self.agents.boundary[i],
            action:     self.actions.get(i).copied().unwrap_or_default(),
            relations:  self.coherence.relation_count(agent),
        })
    }

    /// Every living agent in ascending id order.
    pub fn living(&self) -> impl Iterator<Item = AgentView> + '_ {
        self.agents.living().filter_map(|a| self.agent(a))
    }
}
