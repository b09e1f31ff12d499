//! The commit phase.
//!
//! Decisions from the compute phase are first assembled into a
//! [`TickCommit`]; assembly checks every decision and fails without touching
//! any state.  Applying the commit cannot fail.  Effects land in this order,
//! each step in ascending `AgentId` order:
//!
//! ```text
//! ① movement      pressure/weights from the decision, then one step
//! ② interactions  forage, attacks by dangers, escapes, meetings
//! ③ hunting       group formation, strike, resolution, food sharing
//! ④ κ idle decay  every relation not touched this tick
//! ⑤ prediction    record what each agent saw this tick
//! ⑥ life          drives, starvation, death
//! ⑦ boundaries    co-location, eviction, merging
//! ```
//!
//! The clock is advanced by [`Sim::step`] once the commit is done.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use ssd_agent::{Activity, AgentStore};
use ssd_behavior::{
    Action, BehaviorModel, CoherenceStore, Decision, LeapTrigger, Outcome, OutcomeKind, Propagator,
};
use ssd_core::{AgentId, Category, Descriptor, HuntingConfig, Position, TargetId, Tick};
use ssd_social::{BoundaryEvent, hunters_from};
use ssd_spatial::ProximityIndex;

use crate::{Environment, OutcomeEvent, Sim, SimError, SimResult, TickReport};

/// Strength of the κ penalty among members of a failed hunt.
const HUNT_FAILURE_STRENGTH: f32 = 0.5;

// ── TickCommit ────────────────────────────────────────────────────────────────

/// Everything one tick will change, checked and ready to apply.
pub(crate) struct TickCommit {
    tick:        Tick,
    descriptors: Vec<Descriptor>,
    /// Spatial index over `descriptors` as they stood during the compute phase.
    index:       ProximityIndex,
    decisions:   Vec<Decision>,
}

impl TickCommit {
    /// Check the decisions against the store.  Every decision must belong to
    /// a distinct living agent, in ascending order, with finite state.
    pub(crate) fn assemble(
        tick:        Tick,
        agents:      &AgentStore,
        descriptors: Vec<Descriptor>,
        index:       ProximityIndex,
        decisions:   Vec<Decision>,
    ) -> SimResult<Self> {
        let mut last: Option<AgentId> = None;
        for d in &decisions {
            let invalid = |reason| SimError::InvalidDecision { agent: d.agent, reason };
            if !agents.is_alive(d.agent) {
                return Err(invalid("agent is not alive"));
            }
            if last.is_some_and(|l| l >= d.agent) {
                return Err(invalid("decisions out of order"));
            }
            if !d.weights.is_finite() || !d.pressure.unresolved.is_finite() {
                return Err(invalid("non-finite pressure or weights"));
            }
            last = Some(d.agent);
        }
        Ok(Self { tick, descriptors, index, decisions })
    }
}

/// Descriptor lookup for one commit.
struct Lookup<'a> {
    descriptors: &'a [Descriptor],
    by_id:       FxHashMap<TargetId, usize>,
}

impl<'a> Lookup<'a> {
    fn new(descriptors: &'a [Descriptor]) -> Self {
        let by_id = descriptors.iter().enumerate().map(|(i, d)| (d.id, i)).collect();
        Self { descriptors, by_id }
    }

    fn get(&self, id: TargetId) -> Option<&'a Descriptor> {
        self.by_id.get(&id).map(|&i| &self.descriptors[i])
    }
}

// ── Application ───────────────────────────────────────────────────────────────

impl<B: BehaviorModel, E: Environment> Sim<B, E> {
    /// Apply an assembled commit.  Returns the tick's report and the outcome
    /// events for the environment.
    pub(crate) fn apply(&mut self, commit: TickCommit) -> (TickReport, Vec<OutcomeEvent>) {
        let TickCommit { tick, descriptors, index, decisions } = commit;
        let lookup = Lookup::new(&descriptors);
        let mut report = TickReport { tick, ..TickReport::default() };
        let mut events = Vec::new();

        if self.actions.len() < self.agents.count {
            self.actions.resize(self.agents.count, Action::Idle);
        }
        let seen_from = self.agents.position.clone();

        let activity = self.apply_movement(&decisions, &lookup, &mut report);
        self.apply_interactions(tick, &decisions, &lookup, &mut events);
        self.apply_hunts(tick, &decisions, &lookup, &mut events, &mut report);
        self.coherence.idle_decay(tick);
        self.record_observations(tick, &seen_from, &descriptors, &index, &events);
        self.apply_life(tick, &activity, &mut events, &mut report);
        self.apply_boundaries(tick, &mut report);

        report.alive = self.agents.alive_count();
        report.boundaries = self.boundaries.len();
        report.mean_kappa = self.coherence.mean_kappa();
        debug!(
            %tick,
            alive = report.alive,
            leaps = report.leaps,
            hunts = report.hunts_resolved,
            events = events.len(),
            "tick committed"
        );
        (report, events)
    }

    // ── ① Movement ────────────────────────────────────────────────────────

    fn apply_movement(
        &mut self,
        decisions: &[Decision],
        lookup:    &Lookup<'_>,
        report:    &mut TickReport,
    ) -> Vec<Activity> {
        let world = &self.params.world;
        let mut activity = vec![Activity::Still; self.agents.count];

        for d in decisions {
            let i = d.agent.index();
            self.agents.pressure[i] = d.pressure;
            self.agents.weights[i] = d.weights;
            self.actions[i] = d.action;
            report.actions[d.action.kind().index()] += 1;
            if d.leap.is_some() {
                report.leaps += 1;
            }

            let here = self.agents.position[i];
            let toward = d
                .focus
                .or_else(|| d.action.target().and_then(|t| lookup.get(t)).map(|t| t.position));
            let next = match (d.action, toward) {
                (Action::Flee(_), Some(threat)) => here.step_away(threat, world.flee_speed),
                (Action::Approach(_) | Action::Forage(_) | Action::Hunt(_) | Action::Explore, Some(p)) => {
                    here.step_toward(p, world.move_speed)
                }
                _ => here,
            };
            if next.is_finite() {
                self.agents.position[i] = next;
            }

            activity[i] = match d.action {
                Action::Rest => Activity::Resting,
                a if a.is_moving() => Activity::Moving,
                _ => Activity::Still,
            };
        }
        activity
    }

    // ── ② Interactions ────────────────────────────────────────────────────

    fn apply_interactions(
        &mut self,
        tick:      Tick,
        decisions: &[Decision],
        lookup:    &Lookup<'_>,
        events:    &mut Vec<OutcomeEvent>,
    ) {
        let params = &self.params;
        let reach = params.world.interact_radius;
        let propagator = Propagator::new(&params.propagation);
        let leap = LeapTrigger::new(&params.leap);

        // Forage: each resource feeds one agent per tick, lowest id first.
        let mut eaten: FxHashSet<TargetId> = FxHashSet::default();
        for d in decisions {
            let Action::Forage(target) = d.action else { continue };
            let Some(res) = lookup.get(target) else { continue };
            let i = d.agent.index();
            if res.category != Category::Resource || self.agents.position[i].distance(res.position) > reach {
                continue;
            }
            if !eaten.insert(target) {
                self.coherence.update(d.agent, target, Outcome::full(OutcomeKind::ResourceLost), tick);
                events.push(OutcomeEvent::ForageMissed { agent: d.agent, resource: target });
                continue;
            }
            let amount = res.magnitude.min(1.0);
            self.agents.drives[i].eat(&params.drives, amount);
            self.agents.successes[i].record(target, tick);
            self.coherence.update(d.agent, target, Outcome::full(OutcomeKind::ResourceAcquired), tick);
            events.push(OutcomeEvent::Foraged { agent: d.agent, resource: target, amount });
        }

        // Attacks: every danger hits every living agent within reach.
        let bodies = ProximityIndex::build(
            self.agents.living().map(|a| (a.index(), self.agents.position[a.index()])),
        );
        let mut attacked: FxHashSet<(AgentId, TargetId)> = FxHashSet::default();
        for danger in lookup.descriptors.iter().filter(|d| d.category == Category::Danger) {
            for slot in bodies.within(danger.position, reach) {
                let agent = AgentId(slot as u32);
                let damage = params.drives.attack_damage * danger.magnitude;
                self.agents.damage(agent, damage);
                self.agents.drives[slot].startle(&params.drives, danger.magnitude);
                self.coherence.update(agent, danger.id, Outcome::full(OutcomeKind::Attacked), tick);
                let raw = propagator.raw_stimulus(Category::Danger, danger.magnitude, 0.0);
                leap.record_failure(&mut self.agents.pressure[slot], raw, params.propagation.affinity(Category::Danger));
                attacked.insert((agent, danger.id));
                debug!(%agent, by = %danger.id, damage, "attacked");
                events.push(OutcomeEvent::Attacked { agent, by: danger.id, damage });
            }
        }

        // Escapes: a flight the threat did not catch.
        for d in decisions {
            let Action::Flee(from) = d.action else { continue };
            if attacked.contains(&(d.agent, from)) {
                continue;
            }
            self.agents.successes[d.agent.index()].record(from, tick);
            self.coherence.update(d.agent, from, Outcome::full(OutcomeKind::Escaped), tick);
            events.push(OutcomeEvent::Escaped { agent: d.agent, from });
        }

        // Meetings: one per pair per tick.
        let mut met: FxHashSet<(AgentId, AgentId)> = FxHashSet::default();
        for d in decisions {
            let Action::Approach(TargetId::Agent(other)) = d.action else { continue };
            if !self.agents.is_alive(other) {
                continue;
            }
            let (a, b) = (d.agent, other);
            if self.agents.position[a.index()].distance(self.agents.position[b.index()]) > reach
                || !met.insert((a.min(b), a.max(b)))
            {
                continue;
            }
            self.coherence.update(a, TargetId::Agent(b), Outcome::full(OutcomeKind::Encountered), tick);
            self.coherence.update(b, TargetId::Agent(a), Outcome::full(OutcomeKind::Encountered), tick);
            self.agents.drives[a.index()].socialize();
            self.agents.drives[b.index()].socialize();
            events.push(OutcomeEvent::Met { agent: a, other: b });
        }
    }

    // ── ③ Hunting ─────────────────────────────────────────────────────────

    fn apply_hunts(
        &mut self,
        tick:      Tick,
        decisions: &[Decision],
        lookup:    &Lookup<'_>,
        events:    &mut Vec<OutcomeEvent>,
        report:    &mut TickReport,
    ) {
        let hunters = hunters_from(decisions, &self.agents.position);
        if hunters.is_empty() && self.hunts.groups().is_empty() {
            return;
        }

        let coherence = &self.coherence;
        let hunt = self.hunts.step(
            tick,
            self.config.seed,
            &hunters,
            |t| lookup.get(t).copied().filter(|d| d.category == Category::Prey),
            |a, b| coherence.mutual(a, b),
        );

        let params = &self.params;
        let propagator = Propagator::new(&params.propagation);
        let leap = LeapTrigger::new(&params.leap);

        for result in &hunt.resolved {
            let members = &result.members;
            report.hunts_resolved += 1;

            if result.success {
                report.hunts_succeeded += 1;
                let shares = plan_shares(&self.agents, members, result.food_each, &params.hunting);
                for &m in members {
                    let i = m.index();
                    let given: f32 = shares.iter().filter(|s| s.giver == m).map(|s| s.amount).sum();
                    self.agents.drives[i].eat(&params.drives, result.food_each - given);
                    self.agents.successes[i].record(result.prey, tick);
                    self.coherence.update(m, result.prey, Outcome::full(OutcomeKind::ResourceAcquired), tick);
                }
                reinforce_members(&mut self.coherence, members, Outcome::full(OutcomeKind::Cooperated), tick);
                events.push(OutcomeEvent::PreyCaptured {
                    prey:      result.prey,
                    hunters:   members.clone(),
                    food_each: result.food_each,
                });

                for s in shares {
                    self.agents.drives[s.receiver.index()].eat(&params.drives, s.amount);
                    let outcome = Outcome::full(OutcomeKind::Cooperated);
                    self.coherence.update(s.giver, TargetId::Agent(s.receiver), outcome, tick);
                    self.coherence.update(s.receiver, TargetId::Agent(s.giver), outcome, tick);
                    report.shares += 1;
                    debug!(tick = %tick, giver = %s.giver, receiver = %s.receiver, amount = s.amount, "food shared");
                    events.push(OutcomeEvent::Shared { giver: s.giver, receiver: s.receiver, amount: s.amount });
                }
            } else {
                let magnitude = lookup.get(result.prey).map_or(1.0, |d| d.magnitude);
                let raw = propagator.raw_stimulus(Category::Prey, magnitude, 0.0);
                for &m in members {
                    leap.record_failure(&mut self.agents.pressure[m.index()], raw, params.propagation.affinity(Category::Prey));
                }
                let outcome = Outcome::new(OutcomeKind::HuntFailed, HUNT_FAILURE_STRENGTH);
                reinforce_members(&mut self.coherence, members, outcome, tick);
                events.push(OutcomeEvent::PreyEscaped { prey: result.prey, hunters: members.clone() });
            }
        }
    }

    // ── ⑤ Prediction history ──────────────────────────────────────────────

    fn record_observations(
        &mut self,
        tick:        Tick,
        seen_from:   &[Position],
        descriptors: &[Descriptor],
        index:       &ProximityIndex,
        events:      &[OutcomeEvent],
    ) {
        let radius = self.params.world.perception_radius;
        let living: Vec<AgentId> = self.agents.living().collect();
        for agent in living {
            let me = TargetId::Agent(agent);
            for slot in index.within(seen_from[agent.index()], radius) {
                let d = &descriptors[slot];
                if d.id != me {
                    self.predictions.observe(agent, d.id, d.category, d.position, tick);
                }
            }
        }
        for e in events {
            if let OutcomeEvent::PreyCaptured { prey, .. } = e {
                self.predictions.forget_target(*prey);
            }
        }
        self.predictions.expire(tick);
    }

    // ── ⑥ Drives, health, death ───────────────────────────────────────────

    fn apply_life(
        &mut self,
        tick:     Tick,
        activity: &[Activity],
        events:   &mut Vec<OutcomeEvent>,
        report:   &mut TickReport,
    ) {
        let drives_cfg = &self.params.drives;
        let mut dead = Vec::new();
        let living: Vec<AgentId> = self.agents.living().collect();
        for agent in living {
            let i = agent.index();
            let act = activity.get(i).copied().unwrap_or(Activity::Still);
            self.agents.drives[i].tick(drives_cfg, act);
            if self.agents.drives[i].is_starving() {
                self.agents.damage(agent, drives_cfg.starvation_damage);
            }
            if self.agents.health[i] <= 0.0 {
                dead.push(agent);
            }
        }

        for agent in dead {
            self.agents.kill(agent);
            self.coherence.remove_agent(agent);
            self.predictions.remove_agent(agent);
            self.predictions.forget_target(TargetId::Agent(agent));
            self.hunts.remove_agent(agent);
            for e in self.boundaries.remove_agent(agent) {
                if matches!(e, BoundaryEvent::Dissolved { .. }) {
                    report.boundaries_dissolved += 1;
                }
            }
            report.deaths += 1;
            info!(%agent, %tick, "agent died");
            events.push(OutcomeEvent::Died { agent });
        }
    }

    // ── ⑦ Boundaries ──────────────────────────────────────────────────────

    fn apply_boundaries(&mut self, tick: Tick, report: &mut TickReport) {
        let living: Vec<(AgentId, Position)> = self
            .agents
            .living()
            .map(|a| (a, self.agents.position[a.index()]))
            .collect();
        let coherence = &self.coherence;
        for e in self.boundaries.update(tick, &living, |a, b| coherence.mutual(a, b)) {
            match e {
                BoundaryEvent::Formed { .. } => report.boundaries_formed += 1,
                BoundaryEvent::Dissolved { .. } => report.boundaries_dissolved += 1,
                _ => {}
            }
        }
        for i in 0..self.agents.count {
            let agent = AgentId(i as u32);
            self.agents.boundary[i] = if self.agents.alive[i] { self.boundaries.boundary_of(agent) } else { None };
        }
    }
}

/// Apply `outcome` in both directions to every pair of `members`.
/// One hunter's gift to a hungry member of its boundary.
struct Share {
    giver:    AgentId,
    receiver: AgentId,
    amount:   f32,
}

/// Each hunter in a boundary hands `food_each × share_fraction × empathy`
/// to the hungriest nearby member of that boundary who did not hunt and has
/// not already been fed from this prey.  Ties go to the lower id.
fn plan_shares(agents: &AgentStore, hunters: &[AgentId], food_each: f32, cfg: &HuntingConfig) -> Vec<Share> {
    let mut shares: Vec<Share> = Vec::new();
    for &giver in hunters {
        let g = giver.index();
        let Some(boundary) = agents.boundary[g] else { continue };
        let amount = food_each * cfg.share_fraction * agents.personality[g].empathy;
        if !(amount > 0.0) {
            continue;
        }
        let here = agents.position[g];
        let hunger = |a: &AgentId| agents.drives[a.index()].hunger;
        let receiver = agents
            .living()
            .filter(|r| !hunters.contains(r) && !shares.iter().any(|s| s.receiver == *r))
            .filter(|r| agents.boundary[r.index()] == Some(boundary))
            .filter(|r| hunger(r) > cfg.share_hunger)
            .filter(|r| here.distance(agents.position[r.index()]) <= cfg.share_radius)
            .max_by(|a, b| hunger(a).total_cmp(&hunger(b)).then_with(|| b.cmp(a)));
        if let Some(receiver) = receiver {
            shares.push(Share { giver, receiver, amount });
        }
    }
    shares
}

fn reinforce_members(coherence: &mut CoherenceStore, members: &[AgentId], outcome: Outcome, tick: Tick) {
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            coherence.update(a, TargetId::Agent(b), outcome, tick);
            coherence.update(b, TargetId::Agent(a), outcome, tick);
        }
    }
}
