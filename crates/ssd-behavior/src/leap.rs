//! The leap trigger: discrete reorganization of layer weights.
//!
//! When an agent's unresolved pressure exceeds `threshold`, the layer that
//! absorbed most of it takes weight from every other layer:
//!
//! ```text
//! give_l = min(shift · w_l, w_l − min_weight)    for l ≠ dominant
//! w_dominant += Σ give_l
//! ```
//!
//! Total weight is preserved.  The accumulator and its attribution reset to
//! zero.  κ is never touched; only how memory becomes pressure changes.

use tracing::{debug, info};

use ssd_agent::PressureAccumulator;
use ssd_core::{AgentId, Layer, LayerVec, LeapConfig, Tick};

use crate::LeapEvent;

#[derive(Copy, Clone)]
pub struct LeapTrigger<'a> {
    cfg: &'a LeapConfig,
}

impl<'a> LeapTrigger<'a> {
    pub fn new(cfg: &'a LeapConfig) -> Self {
        Self { cfg }
    }

    /// Weights after shifting toward `dominant`.
    pub fn reorganize(&self, weights: &LayerVec, dominant: Layer) -> LayerVec {
        let mut out = *weights;
        let mut moved = 0.0;
        for layer in Layer::ALL {
            if layer == dominant {
                continue;
            }
            let w = out[layer];
            let give = (self.cfg.shift * w).min(w - self.cfg.min_weight).max(0.0);
            out[layer] = w - give;
            moved += give;
        }
        out[dominant] += moved;
        out
    }

    /// Check the accumulator and leap if it is over threshold.  Called once
    /// per agent per tick, so at most one leap fires per tick.
    pub fn evaluate(
        &self,
        agent:   AgentId,
        acc:     &mut PressureAccumulator,
        weights: &mut LayerVec,
        tick:    Tick,
    ) -> Option<LeapEvent> {
        if !(acc.unresolved > self.cfg.threshold) {
            return None;
        }

        let before = *weights;
        let dominant = acc.attribution.dominant();
        match dominant {
            Some(layer) => {
                *weights = self.reorganize(weights, layer);
                info!(%agent, %tick, layer = %layer, unresolved = acc.unresolved, "leap");
            }
            None => {
                debug!(%agent, %tick, unresolved = acc.unresolved, "leap without dominant layer; weights kept");
            }
        }

        let event = LeapEvent {
            tick,
            unresolved: acc.unresolved,
            dominant,
            before,
            after: *weights,
        };
        acc.reset_unresolved();
        acc.leaps += 1;
        acc.last_leap = Some(tick);
        Some(event)
    }

    /// Pressure added by a failure (failed escape, failed hunt, attack),
    /// attributed across layers by `profile`.
    pub fn record_failure(&self, acc: &mut PressureAccumulator, raw: f32, profile: &LayerVec) {
        acc.defer_profile(self.cfg.failure_pressure * raw.max(0.0), profile);
    }
}
