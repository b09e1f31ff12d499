//! The `Sim` struct and its tick loop.

use tracing::{debug, info, warn};

use ssd_agent::{AgentRngs, AgentSeed, AgentStore};
use ssd_behavior::{Action, BehaviorModel, CoherenceStore, Decision, PredictionStore, TickContext};
use ssd_core::{AgentId, Descriptor, SimClock, SimConfig, SsdConfig, TargetId, Tick};
use ssd_social::{BoundaryTracker, HuntRegistry};
use ssd_spatial::ProximityIndex;

use crate::commit::TickCommit;
use crate::{Environment, SimObserver, SimResult, SimSnapshot, TickReport};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<B, E>` holds all simulation state and drives the two-phase tick:
///
/// 1. **Snapshot**: ask the [`Environment`] for descriptors, validate them,
///    add one descriptor per living agent and index them spatially.
/// 2. **Compute phase** (optionally parallel with the `parallel` feature):
///    call [`BehaviorModel::decide`] for every living agent against a
///    read-only [`TickContext`].
/// 3. **Commit phase** (sequential, ascending `AgentId`): assemble a
///    [`TickCommit`] from the decisions and apply it atomically.  See
///    [`crate::commit`] for the order of effects.
/// 4. Hand the tick's outcomes to the environment and advance the clock.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<B: BehaviorModel, E: Environment> {
    /// Run-level configuration (total ticks, seed, output interval, …).
    pub config: SimConfig,

    /// Simulation clock.
    pub clock: SimClock,

    /// Agent state (SoA arrays).  Behavior models read it through
    /// `TickContext`; only the commit phase writes it.
    pub agents: AgentStore,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    pub coherence: CoherenceStore,

    pub predictions: PredictionStore,

    pub boundaries: BoundaryTracker,

    pub hunts: HuntRegistry,

    /// The behavior model.  Called once per living agent per tick.
    pub behavior: B,

    pub environment: E,

    /// Last chosen action per agent slot.
    pub actions: Vec<Action>,

    /// Model parameters.  Fixed for the whole run.
    pub(crate) params: SsdConfig,

    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<B: BehaviorModel, E: Environment> Sim<B, E> {
    // ── Public API ────────────────────────────────────────────────────────

    /// The model parameters this run was built with.
    pub fn params(&self) -> &SsdConfig {
        &self.params
    }

    /// The tick the next [`step`][Self::step] will process.
    pub fn tick(&self) -> Tick {
        self.clock.current_tick
    }

    /// κ(agent → target), baseline for unseen pairs.
    pub fn kappa(&self, agent: AgentId, target: TargetId) -> f32 {
        self.coherence.get(agent, target)
    }

    /// Read-only view of the committed state.
    pub fn snapshot(&self) -> SimSnapshot<'_> {
        SimSnapshot {
            tick:       self.clock.current_tick,
            agents:     &self.agents,
            actions:    &self.actions,
            coherence:  &self.coherence,
            boundaries: &self.boundaries,
            hunts:      &self.hunts,
        }
    }

    /// Add an agent between ticks.  It takes part from the next tick on.
    pub fn spawn_agent(&mut self, seed: AgentSeed) -> AgentId {
        let agent = self.agents.push(seed, self.clock.current_tick);
        self.rngs.push(agent);
        self.coherence.ensure_agent(agent);
        self.predictions.ensure_agent(agent);
        self.actions.push(Action::Idle);
        debug!(%agent, tick = %self.clock.current_tick, "agent spawned");
        agent
    }

    /// Advance one tick.
    ///
    /// Either the whole tick commits or, if the commit cannot be assembled,
    /// nothing changes (agent RNG streams included) and the error is returned.
    pub fn step(&mut self) -> SimResult<TickReport> {
        let now = self.clock.current_tick;
        let (descriptors, dropped) = self.gather_descriptors(now);
        let index = ProximityIndex::build(descriptors.iter().enumerate().map(|(i, d)| (i, d.position)));

        let rngs_before = self.rngs.clone();
        let decisions = self.compute_decisions(now, &descriptors, &index);
        let commit = match TickCommit::assemble(now, &self.agents, descriptors, index, decisions) {
            Ok(commit) => commit,
            Err(e) => {
                self.rngs = rngs_before;
                warn!(tick = %now, error = %e, "tick discarded");
                return Err(e);
            }
        };
        let (mut report, events) = self.apply(commit);
        report.dropped_descriptors = dropped;

        self.environment.on_outcomes(now, &events);
        self.clock.advance();
        Ok(report)
    }

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let start = self.clock.current_tick;
        while self.clock.current_tick < self.config.end_tick() {
            self.run_one(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(from = %start, to = %self.clock.current_tick, alive = self.agents.alive_count(), "run finished");
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.run_one(observer)?;
        }
        Ok(())
    }

    fn run_one<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let report = self.step()?;
        observer.on_tick_end(&report);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            let mut snapshot = self.snapshot();
            snapshot.tick = now;
            observer.on_snapshot(&snapshot);
        }
        Ok(())
    }

    // ── Snapshot ──────────────────────────────────────────────────────────

    /// Validate the environment's records and add the living agents.
    /// Returns the descriptors and how many records were dropped.
    fn gather_descriptors(&mut self, now: Tick) -> (Vec<Descriptor>, usize) {
        let raw = self.environment.descriptors(now);
        let mut out = Vec::with_capacity(raw.len() + self.agents.count);
        let mut dropped = 0;
        for r in &raw {
            match Descriptor::from_raw(r) {
                Some(d) if d.id.agent().is_none() => out.push(d),
                Some(d) => {
                    debug!(tick = %now, id = %d.id, "environment descriptor uses an agent id; dropped");
                    dropped += 1;
                }
                None => {
                    debug!(tick = %now, raw = ?r, "malformed descriptor dropped");
                    dropped += 1;
                }
            }
        }
        for agent in self.agents.living() {
            out.push(Descriptor::for_agent(agent, self.agents.position[agent.index()]));
        }
        (out, dropped)
    }

    // ── Compute phase ─────────────────────────────────────────────────────

    /// One decision per living agent, ascending by id.
    ///
    /// With the `parallel` Cargo feature the calls run on Rayon's thread
    /// pool.  Every agent draws only from its own RNG, so the result is the
    /// same either way.
    fn compute_decisions(
        &mut self,
        now:         Tick,
        descriptors: &[Descriptor],
        index:       &ProximityIndex,
    ) -> Vec<Decision> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let agents   = &self.agents;
        let behavior = &self.behavior;
        let rngs     = &mut self.rngs;
        let ctx = TickContext::new(
            now,
            &self.params,
            agents,
            descriptors,
            index,
            &self.coherence,
            &self.predictions,
        );

        #[cfg(not(feature = "parallel"))]
        {
            agents
                .living()
                .map(|agent| behavior.decide(agent, &ctx, rngs.get_mut(agent)))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let mut work = || -> Vec<Decision> {
                rngs.inner
                    .par_iter_mut()
                    .enumerate()
                    .filter_map(|(i, rng)| {
                        let agent = AgentId(i as u32);
                        agents.is_alive(agent).then(|| behavior.decide(agent, &ctx, rng))
                    })
                    .collect()
            };
            match &self.pool {
                Some(pool) => pool.install(work),
                None => work(),
            }
        }
    }
}
