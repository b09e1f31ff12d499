//! Fluent builder for constructing a [`Sim`].

use ssd_agent::{AgentRngs, AgentStore};
use ssd_behavior::{Action, BehaviorModel, CoherenceStore, PredictionStore};
use ssd_core::{Position, SimConfig, SsdConfig, SsdError};
use ssd_social::{BoundaryTracker, HuntRegistry};

use crate::{Environment, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<B, E>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks, seed, output interval, …
/// - [`AgentStore`] + [`AgentRngs`]: from [`ssd_agent::AgentStoreBuilder`]
/// - `B: BehaviorModel`: the decision model (normally `SsdBehavior`)
/// - `E: Environment`: the descriptor provider and outcome sink
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                  |
/// |---------------------|--------------------------|
/// | `.params(c)`        | `SsdConfig::default()`   |
/// | `.positions(v)`     | Positions in the store   |
///
/// # Example
///
/// ```rust,ignore
/// let (store, rngs) = AgentStoreBuilder::new(n, seed).build();
/// let mut sim = SimBuilder::new(config, store, rngs, SsdBehavior, world)
///     .params(params)
///     .positions(positions)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<B: BehaviorModel, E: Environment> {
    config:      SimConfig,
    params:      SsdConfig,
    agents:      AgentStore,
    rngs:        AgentRngs,
    positions:   Option<Vec<Position>>,
    behavior:    B,
    environment: E,
}

impl<B: BehaviorModel, E: Environment> SimBuilder<B, E> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:      SimConfig,
        agents:      AgentStore,
        rngs:        AgentRngs,
        behavior:    B,
        environment: E,
    ) -> Self {
        Self {
            config,
            params: SsdConfig::default(),
            agents,
            rngs,
            positions: None,
            behavior,
            environment,
        }
    }

    /// Model parameters.  Validated by [`build`][Self::build].
    pub fn params(mut self, params: SsdConfig) -> Self {
        self.params = params;
        self
    }

    /// Initial position of each agent (must be length `agent_count`).
    pub fn positions(mut self, positions: Vec<Position>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].  No tick runs if
    /// any parameter is outside its domain.
    pub fn build(mut self) -> SimResult<Sim<B, E>> {
        self.params.validate()?;
        let agent_count = self.agents.count;

        if self.rngs.len() != agent_count {
            return Err(SimError::AgentCountMismatch {
                expected: agent_count,
                got:      self.rngs.len(),
                what:     "agent RNGs",
            });
        }

        if let Some(p) = self.positions {
            if p.len() != agent_count {
                return Err(SimError::AgentCountMismatch {
                    expected: agent_count,
                    got:      p.len(),
                    what:     "initial positions",
                });
            }
            self.agents.position = p;
        }
        if let Some(bad) = self.agents.position.iter().position(|p| !p.is_finite()) {
            return Err(SsdError::Config {
                field:  "positions",
                reason: format!("agent {bad} has a non-finite position"),
            }
            .into());
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Sim {
            clock:       self.config.make_clock(),
            config:      self.config,
            coherence:   CoherenceStore::new(self.params.coherence.clone(), agent_count),
            predictions: PredictionStore::new(self.params.prediction.clone(), agent_count),
            boundaries:  BoundaryTracker::new(self.params.boundary.clone()),
            hunts:       HuntRegistry::new(self.params.hunting.clone()),
            actions:     vec![Action::Idle; agent_count],
            agents:      self.agents,
            rngs:        self.rngs,
            behavior:    self.behavior,
            environment: self.environment,
            params:      self.params,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
