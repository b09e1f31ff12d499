//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use ssd_agent::{AgentStoreBuilder, Personality};
//! use ssd_core::{LayerVec, Position};
//!
//! let (mut store, rngs) = AgentStoreBuilder::new(4, /*seed=*/ 42)
//!     .weights(LayerVec([1.0, 1.2, 1.0, 0.8]))
//!     .curiosity_range(0.1, 0.4)
//!     .temperament_range(0.3, 0.9)
//!     .build();
//!
//! assert_eq!(store.count, 4);
//! assert_eq!(rngs.len(), 4);
//!
//! // Positions start at the origin; place agents after building.
//! store.position[0] = Position::new(3.0, 4.0);
//!
//! // Or cycle through fixed archetypes instead of drawing traits.
//! let (store, _) = AgentStoreBuilder::new(3, 42)
//!     .presets(&[Personality::GUARDIAN, Personality::LONER])
//!     .build();
//! assert_eq!(store.personality[2], Personality::GUARDIAN);
//! ```

use ssd_core::{AgentId, AgentRng, LayerVec};

use crate::{AgentRngs, AgentStore, Personality};

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
pub struct AgentStoreBuilder {
    count:       usize,
    seed:        u64,
    weights:     LayerVec,
    curiosity:   (f32, f32),
    temperament: (f32, f32),
    presets:     Vec<Personality>,
}

impl AgentStoreBuilder {
    /// Create a builder for `count` agents using `seed` as the global RNG seed.
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            seed,
            weights:     LayerVec::splat(1.0),
            curiosity:   (0.0, 0.0),
            temperament: (Personality::NEUTRAL, Personality::NEUTRAL),
            presets:     Vec::new(),
        }
    }

    /// Layer weights every agent starts with.
    pub fn weights(mut self, weights: LayerVec) -> Self {
        self.weights = weights;
        self
    }

    /// Draw each agent's curiosity trait uniformly from `[min, max]`.
    pub fn curiosity_range(mut self, min: f32, max: f32) -> Self {
        self.curiosity = unit_range(min, max);
        self
    }

    /// Draw sociability, risk tolerance and empathy independently and
    /// uniformly from `[min, max]`.  Default: all neutral.
    pub fn temperament_range(mut self, min: f32, max: f32) -> Self {
        self.temperament = unit_range(min, max);
        self
    }

    /// Assign `presets[i % len]` to agent `i`, overriding both ranges.
    pub fn presets(mut self, presets: &[Personality]) -> Self {
        self.presets = presets.iter().map(|p| p.clamped()).collect();
        self
    }

    /// Construct `AgentStore` and `AgentRngs`.
    ///
    /// Traits are drawn from a dedicated RNG seeded per agent, so the
    /// agents' own decision streams start untouched.
    pub fn build(self) -> (AgentStore, AgentRngs) {
        let personality = (0..self.count as u32)
            .map(|i| {
                if !self.presets.is_empty() {
                    return self.presets[i as usize % self.presets.len()];
                }
                let mut rng = AgentRng::new(!self.seed, AgentId(i));
                let curiosity = draw(&mut rng, self.curiosity);
                Personality::new(
                    curiosity,
                    draw(&mut rng, self.temperament),
                    draw(&mut rng, self.temperament),
                    draw(&mut rng, self.temperament),
                )
            })
            .collect();

        let store = AgentStore::new(self.count, self.weights, personality);
        let rngs = AgentRngs::new(self.count, self.seed);
        (store, rngs)
    }
}

fn unit_range(min: f32, max: f32) -> (f32, f32) {
    let lo = min.clamp(0.0, 1.0);
    (lo, max.clamp(0.0, 1.0).max(lo))
}

fn draw(rng: &mut AgentRng, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}
