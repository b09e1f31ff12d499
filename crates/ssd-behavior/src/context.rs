//! Read-only simulation state passed to every decision.

use ssd_agent::AgentStore;
use ssd_core::{AgentId, Descriptor, Position, SsdConfig, TargetId, Tick};
use ssd_spatial::ProximityIndex;

use crate::{CoherenceStore, PredictionStore, Relation};

/// A read-only snapshot of the world for one tick's compute phase.
///
/// Built once per tick by ssd-sim and shared immutably by every agent.  No
/// decision can observe another agent's update for the same tick because
/// nothing here is writable until the commit phase.
pub struct TickContext<'a> {
    pub tick:        Tick,
    pub config:      &'a SsdConfig,
    pub agents:      &'a AgentStore,
    /// This tick's validated descriptors, agents included.
    pub descriptors: &'a [Descriptor],
    /// Spatial index whose slots are positions in `descriptors`.
    pub index:       &'a ProximityIndex,
    pub coherence:   &'a CoherenceStore,
    pub predictions: &'a PredictionStore,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(
        tick:        Tick,
        config:      &'a SsdConfig,
        agents:      &'a AgentStore,
        descriptors: &'a [Descriptor],
        index:       &'a ProximityIndex,
        coherence:   &'a CoherenceStore,
        predictions: &'a PredictionStore,
    ) -> Self {
        Self { tick, config, agents, descriptors, index, coherence, predictions }
    }

    /// Boundary relation between `perceiver` and the owner of a descriptor.
    /// Rivalry needs both sides to belong to (different) boundaries.
    pub fn relation(&self, perceiver: AgentId, owner: Option<AgentId>) -> Relation {
        let Some(owner) = owner else {
            return Relation::Unaffiliated;
        };
        let mine = self.agents.boundary.get(perceiver.index()).copied().flatten();
        let theirs = self.agents.boundary.get(owner.index()).copied().flatten();
        match (mine, theirs) {
            (Some(a), Some(b)) if a == b => Relation::Same,
            (Some(_), Some(_)) => Relation::Rival,
            _ => Relation::Unaffiliated,
        }
    }

    /// Descriptor slots visible to `agent`, ascending.  Its own body is
    /// excluded.
    pub fn visible(&self, agent: AgentId) -> Vec<usize> {
        let pos = self.agents.position[agent.index()];
        let me = TargetId::Agent(agent);
        self.index
            .within(pos, self.config.world.perception_radius)
            .into_iter()
            .filter(|&slot| self.descriptors.get(slot).is_some_and(|d| d.id != me))
            .collect()
    }

    /// Position of the closest living member of `agent`'s boundary within
    /// `radius`, ties to the lower id.  `None` outside any boundary.
    pub fn nearest_ally(&self, agent: AgentId, radius: f32) -> Option<Position> {
        let here = self.agents.position[agent.index()];
        self.index
            .within(here, radius)
            .into_iter()
            .filter_map(|slot| self.descriptors.get(slot))
            .filter_map(|d| match d.id {
                TargetId::Agent(other) if other != agent && self.agents.is_alive(other) => Some((other, d.position)),
                _ => None,
            })
            .filter(|(other, _)| self.relation(agent, Some(*other)) == Relation::Same)
            .min_by(|(ia, pa), (ib, pb)| {
                here.distance(*pa).total_cmp(&here.distance(*pb)).then_with(|| ia.cmp(ib))
            })
            .map(|(_, p)| p)
    }
}
