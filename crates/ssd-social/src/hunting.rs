//! Cooperative hunting coordinator.
//!
//! Hunters are read from the compute phase's decisions; groups live in the
//! registry across ticks until they strike or lose their prey.  Each tick:
//!
//! 1. Hunters whose score does not exceed `min_participation` are ignored.
//! 2. Existing groups keep members still hunting the same prey.  A group whose
//!    prey is missing from this tick's descriptors is lost.
//! 3. Remaining hunters join the first group on their prey whose every member
//!    has mutual κ above `cooperation_threshold` with them, or seed a new group.
//! 4. A group strikes when any member stands within `strike_radius`.  The
//!    roll uses an RNG seeded from (seed, tick, prey), shared by every group
//!    on that prey, and a prey is captured at most once per tick.
//!
//! A strike ends the group whether it succeeds or not.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use ssd_behavior::{Action, Decision};
use ssd_core::{AgentId, Descriptor, HuntingConfig, Position, SimRng, TargetId, Tick};

// ── Hunter ────────────────────────────────────────────────────────────────────

/// An agent that chose `Hunt(prey)` this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hunter {
    pub agent:    AgentId,
    pub prey:     TargetId,
    /// Alignment score of the Hunt choice.
    pub score:    f32,
    /// Post-movement position.
    pub position: Position,
}

/// Collect hunters from a tick's decisions.
///
/// `positions` is indexed by `AgentId`; decisions for agents without a
/// position are skipped.
pub fn hunters_from(decisions: &[Decision], positions: &[Position]) -> Vec<Hunter> {
    decisions
        .iter()
        .filter_map(|d| match d.action {
            Action::Hunt(prey) => positions.get(d.agent.index()).map(|&position| Hunter {
                agent: d.agent,
                prey,
                score: d.score,
                position,
            }),
            _ => None,
        })
        .collect()
}

// ── Groups and results ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct HuntGroup {
    pub id:      u32,
    pub prey:    TargetId,
    /// Sorted ascending.
    pub members: Vec<AgentId>,
    pub formed:  Tick,
}

impl HuntGroup {
    pub fn is_cooperative(&self) -> bool {
        self.members.len() >= 2
    }
}

/// Outcome of one strike.
#[derive(Clone, Debug, PartialEq)]
pub struct HuntResult {
    pub group:       u32,
    pub prey:        TargetId,
    pub members:     Vec<AgentId>,
    pub success:     bool,
    pub probability: f32,
    /// Food each member receives on success; 0 on failure.
    pub food_each:   f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HuntReport {
    pub resolved: Vec<HuntResult>,
    /// Groups dissolved because their prey vanished or was taken.
    pub lost:     Vec<HuntGroup>,
    /// Groups that are still stalking after this tick.
    pub active:   usize,
    /// Groups seeded this tick.
    pub formed:   usize,
}

impl HuntReport {
    pub fn successes(&self) -> usize {
        self.resolved.iter().filter(|r| r.success).count()
    }
}

// ── HuntRegistry ──────────────────────────────────────────────────────────────

pub struct HuntRegistry {
    cfg:     HuntingConfig,
    next_id: u32,
    groups:  Vec<HuntGroup>,
}

impl HuntRegistry {
    pub fn new(cfg: HuntingConfig) -> Self {
        Self { cfg, next_id: 0, groups: Vec::new() }
    }

    pub fn config(&self) -> &HuntingConfig {
        &self.cfg
    }

    /// Active groups in ascending id order.
    pub fn groups(&self) -> &[HuntGroup] {
        &self.groups
    }

    pub fn group_of(&self, agent: AgentId) -> Option<&HuntGroup> {
        self.groups.iter().find(|g| g.members.binary_search(&agent).is_ok())
    }

    /// Remove a dead agent from any group; emptied groups disappear.
    pub fn remove_agent(&mut self, agent: AgentId) {
        for g in &mut self.groups {
            g.members.retain(|m| *m != agent);
        }
        self.groups.retain(|g| !g.members.is_empty());
    }

    /// Chance that `n` hunters with the given score and κ sums take prey
    /// with `defense`.
    pub fn success_probability(&self, n: usize, score_sum: f32, kappa_sum: f32, defense: f32) -> f32 {
        if n == 0 {
            return 0.0;
        }
        let c = &self.cfg;
        let s = c.solo_strength
            + c.size_weight * (n - 1) as f32
            + c.score_weight * score_sum.max(0.0)
            + c.kappa_weight * kappa_sum.max(0.0);
        let denom = s + c.defense_weight * defense.max(0.0) + c.half_strength;
        if denom <= 0.0 || !denom.is_finite() {
            return 0.0;
        }
        (c.max_success * s / denom).clamp(0.0, c.max_success)
    }

    /// Run one commit-phase step.
    pub fn step(
        &mut self,
        tick:   Tick,
        seed:   u64,
        hunters: &[Hunter],
        prey:   impl Fn(TargetId) -> Option<Descriptor>,
        mutual: impl Fn(AgentId, AgentId) -> f32,
    ) -> HuntReport {
        let mut report = HuntReport::default();

        let mut active: FxHashMap<AgentId, Hunter> = hunters
            .iter()
            .filter(|h| h.score > self.cfg.min_participation)
            .map(|h| (h.agent, *h))
            .collect();

        // Existing groups: keep members still on the same prey.
        let mut groups = std::mem::take(&mut self.groups);
        for g in &mut groups {
            g.members.retain(|m| active.get(m).is_some_and(|h| h.prey == g.prey));
            for m in &g.members {
                active.remove(m);
            }
        }
        groups.retain(|g| !g.members.is_empty());

        // Remaining hunters join or seed groups, in ascending id order.
        let mut newcomers: Vec<Hunter> = active.into_values().collect();
        newcomers.sort_unstable_by_key(|h| h.agent);
        for h in &newcomers {
            let joinable = groups.iter_mut().find(|g| {
                g.prey == h.prey
                    && g.members.iter().all(|m| mutual(*m, h.agent) > self.cfg.cooperation_threshold)
            });
            match joinable {
                Some(g) => {
                    if let Err(pos) = g.members.binary_search(&h.agent) {
                        g.members.insert(pos, h.agent);
                    }
                }
                None => {
                    groups.push(HuntGroup {
                        id:      self.next_id,
                        prey:    h.prey,
                        members: vec![h.agent],
                        formed:  tick,
                    });
                    self.next_id += 1;
                    report.formed += 1;
                }
            }
        }
        groups.sort_unstable_by_key(|g| g.id);

        // Lookups for this tick's scores and positions.
        let by_agent: FxHashMap<AgentId, &Hunter> = hunters.iter().map(|h| (h.agent, h)).collect();
        let mut rolls: BTreeMap<TargetId, SimRng> = BTreeMap::new();
        let mut captured: Vec<TargetId> = Vec::new();

        for g in groups {
            let desc = match prey(g.prey) {
                Some(d) if !captured.contains(&g.prey) => d,
                _ => {
                    debug!(group = g.id, prey = %g.prey, "hunt target lost");
                    report.lost.push(g);
                    continue;
                }
            };

            let in_range = g.members.iter().any(|m| {
                by_agent
                    .get(m)
                    .is_some_and(|h| h.position.distance(desc.position) <= self.cfg.strike_radius)
            });
            if !in_range {
                self.groups.push(g);
                continue;
            }

            let score_sum: f32 = g.members.iter().filter_map(|m| by_agent.get(m)).map(|h| h.score).sum();
            let mut kappa_sum = 0.0;
            for (i, &a) in g.members.iter().enumerate() {
                for &b in &g.members[i + 1..] {
                    kappa_sum += mutual(a, b);
                }
            }
            let probability = self.success_probability(g.members.len(), score_sum, kappa_sum, desc.defense);
            let rng = rolls
                .entry(g.prey)
                .or_insert_with(|| SimRng::for_stream(seed, tick, g.prey.stream_key()));
            let success = rng.gen_bool(probability as f64);
            let food_each = if success { desc.magnitude / g.members.len() as f32 } else { 0.0 };
            if success {
                captured.push(g.prey);
            }

            info!(
                group = g.id,
                prey = %g.prey,
                size = g.members.len(),
                probability,
                success,
                "hunt resolved"
            );
            report.resolved.push(HuntResult {
                group: g.id,
                prey: g.prey,
                members: g.members,
                success,
                probability,
                food_each,
            });
        }

        report.active = self.groups.len();
        report
    }
}
