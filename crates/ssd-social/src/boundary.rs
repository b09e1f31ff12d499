//! Boundary (territory) formation with hysteresis.
//!
//! A *unit* is either an existing boundary or an unaffiliated living agent.
//! Each commit phase:
//!
//! 1. Record which agent pairs stood within `colocation_radius`.
//! 2. Count members whose mean mutual κ to the rest of their boundary is
//!    below `evict_threshold`; after `evict_ticks` in a row they are evicted.
//!    A boundary whose cohesion stays below the same threshold, or that
//!    falls under two members, is dissolved.
//! 3. Two units become a candidate pair when some cross pair was co-located
//!    within `colocation_memory` ticks with mutual κ ≥ `candidate_threshold`.
//!    Candidates whose mean cross κ ≥ `merge_threshold` build a streak and
//!    merge after `sustain_ticks`, strongest first, one merge per unit.
//!
//! Admission needs `merge_threshold`; eviction needs to fall under the lower
//! `evict_threshold`.  κ wandering in between changes nothing.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use ssd_core::{AgentId, BoundaryConfig, BoundaryId, Position, Tick};
use ssd_spatial::ProximityIndex;

// ── Boundary ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Boundary {
    pub id:         BoundaryId,
    /// Sorted ascending.
    pub members:    Vec<AgentId>,
    /// Mean pairwise mutual κ among members, as of the last update.
    pub cohesion:   f32,
    pub formed:     Tick,
    /// Consecutive ticks with cohesion below the eviction threshold.
    pub low_streak: u32,
}

impl Boundary {
    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.binary_search(&agent).is_ok()
    }

    fn insert(&mut self, agent: AgentId) {
        if let Err(pos) = self.members.binary_search(&agent) {
            self.members.insert(pos, agent);
        }
    }

    fn remove(&mut self, agent: AgentId) {
        if let Ok(pos) = self.members.binary_search(&agent) {
            self.members.remove(pos);
        }
    }
}

/// A membership change produced by [`BoundaryTracker::update`].
#[derive(Clone, Debug, PartialEq)]
pub enum BoundaryEvent {
    /// Two unaffiliated agents formed a new boundary.
    Formed { id: BoundaryId, members: Vec<AgentId> },
    /// An unaffiliated agent joined an existing boundary.
    Joined { id: BoundaryId, agent: AgentId },
    /// `absorbed` merged into `into` and no longer exists.
    Merged { into: BoundaryId, absorbed: BoundaryId },
    /// A member drifted out.
    Evicted { id: BoundaryId, agent: AgentId },
    Dissolved { id: BoundaryId },
}

/// A merge-ready pair of units, identified by their lowest member ids.
#[derive(Clone, Debug)]
struct MergeCandidate {
    key:      (AgentId, AgentId),
    strength: f32,
}

// ── BoundaryTracker ───────────────────────────────────────────────────────────

pub struct BoundaryTracker {
    cfg:          BoundaryConfig,
    next_id:      u32,
    boundaries:   BTreeMap<BoundaryId, Boundary>,
    membership:   FxHashMap<AgentId, BoundaryId>,
    /// Last tick each agent pair `(lower, higher)` was co-located.
    colocated:    FxHashMap<(AgentId, AgentId), Tick>,
    /// Consecutive ticks each unit pair has been above the merge threshold.
    merge_streak: FxHashMap<(AgentId, AgentId), u32>,
    /// Consecutive ticks each member has been below the eviction threshold.
    evict_streak: FxHashMap<AgentId, u32>,
}

impl BoundaryTracker {
    pub fn new(cfg: BoundaryConfig) -> Self {
        Self {
            cfg,
            next_id:      0,
            boundaries:   BTreeMap::new(),
            membership:   FxHashMap::default(),
            colocated:    FxHashMap::default(),
            merge_streak: FxHashMap::default(),
            evict_streak: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &BoundaryConfig {
        &self.cfg
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn boundary_of(&self, agent: AgentId) -> Option<BoundaryId> {
        self.membership.get(&agent).copied()
    }

    pub fn get(&self, id: BoundaryId) -> Option<&Boundary> {
        self.boundaries.get(&id)
    }

    /// All live boundaries in ascending id order.
    pub fn boundaries(&self) -> impl Iterator<Item = &Boundary> + '_ {
        self.boundaries.values()
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Drop a dead agent from its boundary and all streaks.
    pub fn remove_agent(&mut self, agent: AgentId) -> Vec<BoundaryEvent> {
        let mut events = Vec::new();
        self.evict_streak.remove(&agent);
        self.colocated.retain(|(a, b), _| *a != agent && *b != agent);
        if let Some(id) = self.membership.remove(&agent) {
            if let Some(b) = self.boundaries.get_mut(&id) {
                b.remove(agent);
                if b.members.len() < 2 {
                    self.dissolve(id, &mut events);
                }
            }
        }
        events
    }

    /// Run one commit-phase update.
    ///
    /// `living` lists every living agent with its post-movement position;
    /// `mutual` returns mutual κ for a pair.
    pub fn update(
        &mut self,
        tick:   Tick,
        living: &[(AgentId, Position)],
        mutual: impl Fn(AgentId, AgentId) -> f32,
    ) -> Vec<BoundaryEvent> {
        let mut events = Vec::new();

        // Anyone not in `living` is gone.
        let alive: FxHashMap<AgentId, Position> = living.iter().copied().collect();
        let departed: Vec<AgentId> = {
            let mut v: Vec<AgentId> =
                self.membership.keys().filter(|a| !alive.contains_key(a)).copied().collect();
            v.sort_unstable();
            v
        };
        for agent in departed {
            events.extend(self.remove_agent(agent));
        }

        self.record_colocations(tick, living);
        self.evict(&mutual, &mut events);
        self.merge(tick, living, &mutual, &mut events);
        events
    }

    fn record_colocations(&mut self, tick: Tick, living: &[(AgentId, Position)]) {
        let index = ProximityIndex::build(living.iter().enumerate().map(|(i, (_, p))| (i, *p)));
        for (i, j) in index.pairs_within(self.cfg.colocation_radius) {
            let (a, b) = (living[i].0, living[j].0);
            self.colocated.insert((a.min(b), a.max(b)), tick);
        }
        let memory = self.cfg.colocation_memory;
        self.colocated.retain(|_, seen| tick.since(*seen) < memory);
    }

    fn evict(&mut self, mutual: &impl Fn(AgentId, AgentId) -> f32, events: &mut Vec<BoundaryEvent>) {
        let (threshold, window) = (self.cfg.evict_threshold, self.cfg.evict_ticks);
        let ids: Vec<BoundaryId> = self.boundaries.keys().copied().collect();

        for id in ids {
            let Some(b) = self.boundaries.get(&id) else { continue };
            let members = b.members.clone();

            // Means are taken against the membership at the start of the tick.
            let mut leaving = Vec::new();
            for &m in &members {
                let mean = mean_to_others(m, &members, mutual);
                let streak = self.evict_streak.entry(m).or_insert(0);
                if mean < threshold {
                    *streak += 1;
                } else {
                    *streak = 0;
                }
                if *streak >= window {
                    leaving.push(m);
                }
            }

            for m in leaving {
                self.evict_streak.remove(&m);
                self.membership.remove(&m);
                if let Some(b) = self.boundaries.get_mut(&id) {
                    b.remove(m);
                }
                debug!(boundary = %id, agent = %m, "member evicted");
                events.push(BoundaryEvent::Evicted { id, agent: m });
            }

            let Some(b) = self.boundaries.get_mut(&id) else { continue };
            if b.members.len() < 2 {
                self.dissolve(id, events);
                continue;
            }
            b.cohesion = cohesion(&b.members, mutual);
            if b.cohesion < threshold {
                b.low_streak += 1;
            } else {
                b.low_streak = 0;
            }
            if b.low_streak >= window {
                self.dissolve(id, events);
            }
        }
    }

    fn merge(
        &mut self,
        tick:   Tick,
        living: &[(AgentId, Position)],
        mutual: &impl Fn(AgentId, AgentId) -> f32,
        events: &mut Vec<BoundaryEvent>,
    ) {
        // Units keyed by their lowest member.
        let mut units: BTreeMap<AgentId, Vec<AgentId>> = BTreeMap::new();
        for b in self.boundaries.values() {
            if let Some(&low) = b.members.first() {
                units.insert(low, b.members.clone());
            }
        }
        for (agent, _) in living {
            if !self.membership.contains_key(agent) {
                units.insert(*agent, vec![*agent]);
            }
        }
        let unit_of = |agent: AgentId| -> Option<AgentId> {
            match self.membership.get(&agent) {
                Some(id) => self.boundaries.get(id).and_then(|b| b.members.first().copied()),
                None => units.contains_key(&agent).then_some(agent),
            }
        };

        // Candidate unit pairs from recent co-locations.
        let mut pairs: Vec<(AgentId, AgentId)> = Vec::new();
        for (&(a, b), _) in self.colocated.iter() {
            if mutual(a, b) < self.cfg.candidate_threshold {
                continue;
            }
            let (Some(ua), Some(ub)) = (unit_of(a), unit_of(b)) else { continue };
            if ua != ub {
                pairs.push((ua.min(ub), ua.max(ub)));
            }
        }
        pairs.sort_unstable();
        pairs.dedup();

        let mut streaks: FxHashMap<(AgentId, AgentId), u32> = FxHashMap::default();
        let mut ready: Vec<MergeCandidate> = Vec::new();
        for key in pairs {
            let (Some(ma), Some(mb)) = (units.get(&key.0), units.get(&key.1)) else { continue };
            let strength = cross_mean(ma, mb, mutual);
            if strength < self.cfg.merge_threshold {
                continue;
            }
            let streak = self.merge_streak.get(&key).copied().unwrap_or(0) + 1;
            streaks.insert(key, streak);
            if streak >= self.cfg.sustain_ticks {
                ready.push(MergeCandidate { key, strength });
            }
        }
        // Pairs that were not above threshold this tick lose their streak.
        self.merge_streak = streaks;

        ready.sort_by(|a, b| b.strength.total_cmp(&a.strength).then_with(|| a.key.cmp(&b.key)));
        let mut merged_units: Vec<AgentId> = Vec::new();
        for cand in ready {
            let (ua, ub) = cand.key;
            if merged_units.contains(&ua) || merged_units.contains(&ub) {
                continue;
            }
            merged_units.push(ua);
            merged_units.push(ub);
            self.merge_streak.remove(&cand.key);
            self.join_units(tick, ua, ub, events);
        }
    }

    /// Merge the units led by `ua` and `ub`.
    fn join_units(&mut self, tick: Tick, ua: AgentId, ub: AgentId, events: &mut Vec<BoundaryEvent>) {
        match (self.boundary_of(ua), self.boundary_of(ub)) {
            (None, None) => {
                let id = BoundaryId(self.next_id);
                self.next_id += 1;
                let members = vec![ua.min(ub), ua.max(ub)];
                for &m in &members {
                    self.membership.insert(m, id);
                    self.evict_streak.remove(&m);
                }
                self.boundaries.insert(id, Boundary {
                    id,
                    members: members.clone(),
                    cohesion: 0.0,
                    formed: tick,
                    low_streak: 0,
                });
                info!(boundary = %id, %tick, members = ?members, "boundary formed");
                events.push(BoundaryEvent::Formed { id, members });
            }
            (Some(id), None) | (None, Some(id)) => {
                let agent = if self.boundary_of(ua).is_none() { ua } else { ub };
                if let Some(b) = self.boundaries.get_mut(&id) {
                    b.insert(agent);
                }
                self.membership.insert(agent, id);
                self.evict_streak.remove(&agent);
                debug!(boundary = %id, %agent, "joined boundary");
                events.push(BoundaryEvent::Joined { id, agent });
            }
            (Some(a), Some(b)) => {
                let (into, absorbed) = (a.min(b), a.max(b));
                let Some(gone) = self.boundaries.remove(&absorbed) else { return };
                for &m in &gone.members {
                    self.membership.insert(m, into);
                    self.evict_streak.remove(&m);
                }
                if let Some(dst) = self.boundaries.get_mut(&into) {
                    for m in gone.members {
                        dst.insert(m);
                    }
                    dst.low_streak = 0;
                }
                info!(%into, %absorbed, %tick, "boundaries merged");
                events.push(BoundaryEvent::Merged { into, absorbed });
            }
        }
    }

    fn dissolve(&mut self, id: BoundaryId, events: &mut Vec<BoundaryEvent>) {
        if let Some(b) = self.boundaries.remove(&id) {
            for m in &b.members {
                self.membership.remove(m);
                self.evict_streak.remove(m);
            }
            info!(boundary = %id, "boundary dissolved");
            events.push(BoundaryEvent::Dissolved { id });
        }
    }
}

/// Mean mutual κ from `agent` to every other member.
fn mean_to_others(agent: AgentId, members: &[AgentId], mutual: &impl Fn(AgentId, AgentId) -> f32) -> f32 {
    let others: Vec<f32> = members.iter().filter(|m| **m != agent).map(|m| mutual(agent, *m)).collect();
    if others.is_empty() {
        return 0.0;
    }
    others.iter().sum::<f32>() / others.len() as f32
}

/// Mean pairwise mutual κ within a member set.
fn cohesion(members: &[AgentId], mutual: &impl Fn(AgentId, AgentId) -> f32) -> f32 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            sum += mutual(a, b);
            n += 1;
        }
    }
    if n == 0 { 0.0 } else { sum / n as f32 }
}

/// Mean mutual κ across two member sets.
fn cross_mean(a: &[AgentId], b: &[AgentId], mutual: &impl Fn(AgentId, AgentId) -> f32) -> f32 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for &x in a {
        for &y in b {
            sum += mutual(x, y);
            n += 1;
        }
    }
    if n == 0 { 0.0 } else { sum / n as f32 }
}
