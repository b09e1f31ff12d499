//! Per-agent pressure bookkeeping.

use ssd_core::{Layer, LayerVec, TargetId, Tick};

/// Running pressure state for one agent.
///
/// `layers` is overwritten every tick with the propagated pressure.
/// `unresolved` only grows (deferred needs, failures) until a leap resets
/// it; successful alignment never drains it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PressureAccumulator {
    /// Pressure per layer from the most recent compute phase.
    pub layers:      LayerVec,
    /// Frustration from needs that were not acted on.
    pub unresolved:  f32,
    /// Which layers the unresolved pressure came from.
    pub attribution: LayerVec,
    /// Leaps fired so far.
    pub leaps:       u32,
    pub last_leap:   Option<Tick>,
}

impl PressureAccumulator {
    /// Add `amount` of unresolved pressure originating in `layer`.
    /// Non-finite or non-positive amounts are ignored.
    pub fn defer(&mut self, amount: f32, layer: Layer) {
        if amount.is_finite() && amount > 0.0 {
            self.unresolved += amount;
            self.attribution[layer] += amount;
        }
    }

    /// Add `amount` spread across layers in proportion to `profile`.
    pub fn defer_profile(&mut self, amount: f32, profile: &LayerVec) {
        let total = profile.sum();
        if !(amount.is_finite() && amount > 0.0 && total > 0.0) {
            return;
        }
        for layer in Layer::ALL {
            self.attribution[layer] += amount * profile[layer].max(0.0) / total;
        }
        self.unresolved += amount;
    }

    pub fn reset_unresolved(&mut self) {
        self.unresolved = 0.0;
        self.attribution = LayerVec::ZERO;
    }
}

/// Bounded record of the targets an agent most recently succeeded with.
///
/// Used as a tie-break: between equally scored actions the agent prefers the
/// target that worked for it most recently.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuccessLog {
    entries: Vec<(TargetId, Tick)>,
}

impl SuccessLog {
    pub const CAPACITY: usize = 8;

    /// Record a success.  The oldest entry is dropped when full.
    pub fn record(&mut self, target: TargetId, tick: Tick) {
        if let Some(slot) = self.entries.iter_mut().find(|(t, _)| *t == target) {
            slot.1 = slot.1.max(tick);
            return;
        }
        if self.entries.len() >= Self::CAPACITY {
            if let Some(oldest) = self
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(_, (t, at))| (*at, std::cmp::Reverse(*t)))
                .map(|(i, _)| i)
            {
                self.entries.swap_remove(oldest);
            }
        }
        self.entries.push((target, tick));
    }

    /// Tick of the latest success with `target`, if remembered.
    pub fn last(&self, target: TargetId) -> Option<Tick> {
        self.entries.iter().find(|(t, _)| *t == target).map(|(_, at)| *at)
    }

    /// Forget a target (e.g. an agent that died).
    pub fn forget(&mut self, target: TargetId) {
        self.entries.retain(|(t, _)| *t != target);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
