//! Turning this tick's descriptors into per-target layer signals.

use ssd_core::{AgentId, Category, Layer, LayerVec, Position, TargetId};

use crate::{Propagator, Relation, TickContext};

/// One perceived target after propagation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TargetSignal {
    pub target:       TargetId,
    pub category:     Category,
    pub position:     Position,
    pub distance:     f32,
    pub magnitude:    f32,
    pub defense:      f32,
    pub relation:     Relation,
    /// Raw stimulus after the boundary modifier.
    pub raw:          f32,
    /// Foresight term added to the Upper layer.
    pub anticipatory: f32,
    /// Forecast says the target is getting closer.
    pub approaching:  bool,
    pub local:        LayerVec,
}

impl TargetSignal {
    /// `Σ w_l × local_l`.
    #[inline]
    pub fn weighted(&self, weights: &LayerVec) -> f32 {
        self.local.dot(weights)
    }
}

/// A danger that is out of sight now but forecast to come within range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PredictedThreat {
    pub target:   TargetId,
    pub position: Position,
    pub local:    LayerVec,
}

/// A threat strong enough to bypass deliberation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Reflex {
    pub target:   TargetId,
    pub position: Position,
    pub layer:    Layer,
    pub peak:     f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Perception {
    /// Ordered by descriptor slot.
    pub signals: Vec<TargetSignal>,
    pub threats: Vec<PredictedThreat>,
    /// Sum of every signal's local pressure.
    pub total:   LayerVec,
    pub reflex:  Option<Reflex>,
}

/// Propagate everything `agent` can see, plus forecast threats it cannot.
pub fn perceive(agent: AgentId, ctx: &TickContext<'_>) -> Perception {
    let cfg = ctx.config;
    let prop = Propagator::new(&cfg.propagation);
    let i = agent.index();
    let here = ctx.agents.position[i];
    let weights = ctx.agents.weights[i];
    let pred_gain = cfg.prediction.gain;

    let mut out = Perception::default();

    for slot in ctx.visible(agent) {
        let d = ctx.descriptors[slot];
        let distance = here.distance(d.position);
        let relation = ctx.relation(agent, d.owner);
        let factor = prop.relation_factor(d.category, relation);
        let raw = prop.raw_stimulus(d.category, d.magnitude, distance) * factor;

        let kappa = ctx.coherence.get(agent, d.id);
        let (anticipatory, approaching) = match ctx.predictions.predict(agent, d.id, kappa) {
            Some(p) => {
                let ahead = here.distance(p.position);
                let raw_ahead = prop.raw_stimulus(d.category, d.magnitude, ahead) * factor;
                (p.confidence * pred_gain * raw_ahead, ahead < distance)
            }
            None => (0.0, false),
        };

        let threat = Propagator::is_threat(d.category, relation);
        let response = prop.propagate(d.category, raw, &weights, anticipatory, threat);

        if let Some(layer) = response.reflex {
            let peak = response.local[layer];
            let stronger = match out.reflex {
                None => true,
                Some(r) => peak > r.peak || (peak == r.peak && d.id < r.target),
            };
            if stronger {
                out.reflex = Some(Reflex { target: d.id, position: d.position, layer, peak });
            }
        }

        out.total += response.local;
        out.signals.push(TargetSignal {
            target: d.id,
            category: d.category,
            position: d.position,
            distance,
            magnitude: d.magnitude,
            defense: d.defense,
            relation,
            raw,
            anticipatory,
            approaching,
            local: response.local,
        });
    }

    // Out-of-sight dangers the agent still remembers.
    let radius = cfg.world.perception_radius;
    for (target, track) in ctx.predictions.tracks(agent) {
        if track.category != Category::Danger || out.signals.iter().any(|s| s.target == target) {
            continue;
        }
        let Some(last) = track.last_position() else { continue };
        let kappa = ctx.coherence.get(agent, target);
        let Some(p) = ctx.predictions.predict(agent, target, kappa) else { continue };
        let ahead = here.distance(p.position);
        if ahead > radius || ahead >= here.distance(last) {
            continue;
        }
        let anticipatory = p.confidence * pred_gain * prop.raw_stimulus(Category::Danger, 1.0, ahead);
        let response = prop.propagate(Category::Danger, 0.0, &weights, anticipatory, false);
        if response.local[Layer::Upper] > 0.0 {
            out.threats.push(PredictedThreat { target, position: p.position, local: response.local });
        }
    }

    out
}
