//! Short-horizon prediction of tracked targets.
//!
//! Each agent keeps a rolling window of `(tick, position)` samples for the
//! targets it has perceived.  A track with at least two samples extrapolates
//! one tick ahead at its mean velocity.  Confidence grows with κ but
//! saturates below `max_confidence`:
//!
//! ```text
//! confidence = max_confidence · κ / (κ + half_kappa)
//! ```

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use ssd_core::{AgentId, Category, Position, PredictionConfig, TargetId, Tick};

/// Observed history of one target, from one agent's point of view.
#[derive(Clone, Debug)]
pub struct Track {
    pub category: Category,
    samples:      VecDeque<(Tick, Position)>,
}

impl Track {
    fn new(category: Category) -> Self {
        Self { category, samples: VecDeque::new() }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last_seen(&self) -> Option<Tick> {
        self.samples.back().map(|(t, _)| *t)
    }

    pub fn last_position(&self) -> Option<Position> {
        self.samples.back().map(|(_, p)| *p)
    }

    /// Mean displacement per tick over the window.  `None` with fewer than
    /// two samples.
    pub fn velocity(&self) -> Option<(f32, f32)> {
        let (t0, p0) = *self.samples.front()?;
        let (t1, p1) = *self.samples.back()?;
        let span = t1.since(t0);
        if self.samples.len() < 2 || span == 0 {
            return None;
        }
        let span = span as f32;
        Some(((p1.x - p0.x) / span, (p1.y - p0.y) / span))
    }
}

/// A one-tick-ahead forecast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Prediction {
    pub position:   Position,
    pub confidence: f32,
}

/// Tracks for every agent, indexed by `AgentId`.
pub struct PredictionStore {
    cfg:    PredictionConfig,
    tracks: Vec<FxHashMap<TargetId, Track>>,
}

impl PredictionStore {
    pub fn new(cfg: PredictionConfig, agents: usize) -> Self {
        Self {
            cfg,
            tracks: (0..agents).map(|_| FxHashMap::default()).collect(),
        }
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.cfg
    }

    pub fn ensure_agent(&mut self, agent: AgentId) {
        if self.tracks.len() <= agent.index() {
            self.tracks.resize_with(agent.index() + 1, FxHashMap::default);
        }
    }

    /// Record that `agent` saw `target` at `position` during `tick`.
    /// A category change starts the track over.
    pub fn observe(
        &mut self,
        agent:    AgentId,
        target:   TargetId,
        category: Category,
        position: Position,
        tick:     Tick,
    ) {
        self.ensure_agent(agent);
        let cap = self.cfg.history_len;
        let track = self.tracks[agent.index()]
            .entry(target)
            .or_insert_with(|| Track::new(category));
        if track.category != category {
            *track = Track::new(category);
        }
        if track.last_seen() == Some(tick) {
            track.samples.pop_back();
        }
        track.samples.push_back((tick, position));
        while track.samples.len() > cap {
            track.samples.pop_front();
        }
    }

    /// Drop tracks not refreshed within `expiry_ticks` of `now`.
    pub fn expire(&mut self, now: Tick) {
        let expiry = self.cfg.expiry_ticks;
        for slot in &mut self.tracks {
            slot.retain(|_, t| t.last_seen().is_some_and(|seen| now.since(seen) < expiry));
        }
    }

    pub fn remove_agent(&mut self, agent: AgentId) {
        if let Some(slot) = self.tracks.get_mut(agent.index()) {
            slot.clear();
        }
    }

    /// Forget every track of `target` held by anyone (it left the world).
    pub fn forget_target(&mut self, target: TargetId) {
        for slot in &mut self.tracks {
            slot.remove(&target);
        }
    }

    pub fn track(&self, agent: AgentId, target: TargetId) -> Option<&Track> {
        self.tracks.get(agent.index())?.get(&target)
    }

    /// All of `agent`'s tracks, sorted by target.
    pub fn tracks(&self, agent: AgentId) -> Vec<(TargetId, &Track)> {
        let mut out: Vec<(TargetId, &Track)> = self
            .tracks
            .get(agent.index())
            .map(|m| m.iter().map(|(t, tr)| (*t, tr)).collect())
            .unwrap_or_default();
        out.sort_unstable_by_key(|(t, _)| *t);
        out
    }

    pub fn confidence(&self, kappa: f32) -> f32 {
        let k = kappa.max(0.0);
        self.cfg.max_confidence * k / (k + self.cfg.half_kappa)
    }

    /// Forecast `target`'s position one tick after its last sample.
    /// `None` (no anticipation) when the track is missing or too short.
    pub fn predict(&self, agent: AgentId, target: TargetId, kappa: f32) -> Option<Prediction> {
        let track = self.track(agent, target)?;
        let (vx, vy) = track.velocity()?;
        let last = track.last_position()?;
        let position = last.offset(vx, vy);
        if !position.is_finite() {
            return None;
        }
        Some(Prediction { position, confidence: self.confidence(kappa) })
    }
}
