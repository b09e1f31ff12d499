//! The four-layer signal propagator.
//!
//! One descriptor becomes a raw stimulus (category gain over distance), and
//! the stimulus is pushed through Physical → Foundation → Core → Upper:
//!
//! ```text
//! r₀      = raw
//! input_l = w_l · affinity[cat][l] · r_l        (+ anticipatory on Upper)
//! local_l = s_max · tanh(input_l / s_max)
//! r_l+1   = r_l · attenuation_l
//! ```
//!
//! Saturation keeps every local pressure inside `(-s_max, s_max)` however
//! large the input.  The first layer whose local pressure crosses the
//! urgency threshold on a threat marks a reflex; propagation still runs to
//! the top so the full response is recorded.

use ssd_core::{Category, Layer, LayerVec, PropagationConfig};

/// How the owner of a descriptor stands relative to the perceiver.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Relation {
    /// No owner, or neither side belongs to a boundary.
    #[default]
    Unaffiliated,
    /// Owner is inside the perceiver's boundary.
    Same,
    /// Owner and perceiver belong to different boundaries.
    Rival,
}

/// Per-layer response to a single stimulus.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayerResponse {
    pub local:  LayerVec,
    /// First layer whose local pressure crossed the urgency threshold.
    pub reflex: Option<Layer>,
}

/// Stateless propagator over a borrowed configuration.
#[derive(Copy, Clone)]
pub struct Propagator<'a> {
    cfg: &'a PropagationConfig,
}

impl<'a> Propagator<'a> {
    pub fn new(cfg: &'a PropagationConfig) -> Self {
        Self { cfg }
    }

    /// `magnitude × gain / (1 + distance / falloff)`.  Zero for non-finite
    /// distance.
    pub fn raw_stimulus(&self, category: Category, magnitude: f32, distance: f32) -> f32 {
        if !distance.is_finite() {
            return 0.0;
        }
        let d = distance.max(0.0);
        magnitude * self.cfg.gain(category) / (1.0 + d / self.cfg.falloff)
    }

    /// Boundary modifier on raw stimulus.  Only threats are modified.
    pub fn relation_factor(&self, category: Category, relation: Relation) -> f32 {
        match (category, relation) {
            (Category::Danger, Relation::Same) => 1.0 - self.cfg.safety_bonus,
            (Category::Danger | Category::Agent, Relation::Rival) => 1.0 + self.cfg.threat_bonus,
            _ => 1.0,
        }
    }

    /// `true` if a stimulus of this kind may trigger a reflex flight.
    pub fn is_threat(category: Category, relation: Relation) -> bool {
        category == Category::Danger || (category == Category::Agent && relation == Relation::Rival)
    }

    /// Push `raw` through the four layers.
    pub fn propagate(
        &self,
        category:     Category,
        raw:          f32,
        weights:      &LayerVec,
        anticipatory: f32,
        threat:       bool,
    ) -> LayerResponse {
        let affinity = self.cfg.affinity(category);
        let s_max = self.cfg.saturation;

        let mut local = LayerVec::ZERO;
        let mut reflex = None;
        let mut residual = if raw.is_finite() { raw } else { 0.0 };

        for layer in Layer::ALL {
            let mut input = weights[layer] * affinity[layer] * residual;
            if layer == Layer::Upper && anticipatory.is_finite() {
                input += anticipatory;
            }
            let p = s_max * (input / s_max).tanh();
            local[layer] = p;
            if threat && reflex.is_none() && p > self.cfg.urgency_threshold {
                reflex = Some(layer);
            }
            residual *= self.cfg.attenuation[layer];
        }

        LayerResponse { local, reflex }
    }
}
