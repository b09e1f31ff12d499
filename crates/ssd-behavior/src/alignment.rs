//! The alignment selector: scoring candidates and picking one.
//!
//! ```text
//! score = (Σ_l w_l · pressure_l) · κ(target) + drive_bonus(action)
//! ```
//!
//! Personality bends the drive bonuses: sociability scales the loneliness
//! pull on Approach, risk tolerance damps the fear bonus on Flee, and
//! curiosity alone drives Explore.
//!
//! Ties (within `tie_epsilon`) are broken by lower energy cost, then the
//! most recently successful target, then the lower target id, and only
//! then by the agent's seeded RNG.

use ssd_agent::{Drives, Personality, SuccessLog};
use ssd_core::{AgentRng, AlignmentConfig, Category, Layer, LayerVec, TargetId};

use crate::{Action, Candidate, CandidateSource, Perception, Relation};

/// Stateless selector over a borrowed configuration.
#[derive(Copy, Clone)]
pub struct Alignment<'a> {
    cfg: &'a AlignmentConfig,
}

/// The winning candidate, or `None` for Idle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Selection {
    pub candidate: Option<Candidate>,
}

impl<'a> Alignment<'a> {
    pub fn new(cfg: &'a AlignmentConfig) -> Self {
        Self { cfg }
    }

    /// Drive bonus for an action.
    pub fn drive_bonus(&self, action: Action, drives: &Drives, traits: &Personality) -> f32 {
        let c = self.cfg;
        match action {
            Action::Forage(_) | Action::Hunt(_) => c.hunger_bonus * drives.hunger,
            Action::Flee(_) => c.fear_bonus * drives.fear * traits.caution(),
            Action::Rest => c.fatigue_bonus * drives.fatigue,
            Action::Explore => c.curiosity_bonus * traits.curiosity,
            Action::Approach(_) => c.loneliness_bonus * drives.loneliness * traits.social_drive(),
            Action::Idle => 0.0,
        }
    }

    /// The action a perceived category calls for, if any.
    pub fn action_for(category: Category, relation: Relation, target: TargetId) -> Option<Action> {
        match category {
            Category::Danger => Some(Action::Flee(target)),
            Category::Resource => Some(Action::Forage(target)),
            Category::Prey => Some(Action::Hunt(target)),
            Category::Agent if relation == Relation::Rival => Some(Action::Flee(target)),
            Category::Agent => Some(Action::Approach(target)),
            Category::Neutral => None,
        }
    }

    /// Build every scored candidate for this tick.
    pub fn candidates(
        &self,
        perception: &Perception,
        weights:    &LayerVec,
        drives:     &Drives,
        traits:     &Personality,
        kappa:      impl Fn(TargetId) -> f32,
    ) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(perception.signals.len() + 2);

        for s in &perception.signals {
            let Some(action) = Self::action_for(s.category, s.relation, s.target) else {
                continue;
            };
            let score = s.weighted(weights) * kappa(s.target) + self.drive_bonus(action, drives, traits);
            out.push(Candidate {
                action,
                score,
                focus: Some(s.position),
                source: CandidateSource::Signal,
            });
        }

        for t in &perception.threats {
            let action = Action::Flee(t.target);
            let score = t.local.dot(weights) * kappa(t.target) + self.drive_bonus(action, drives, traits);
            out.push(Candidate {
                action,
                score,
                focus: Some(t.position),
                source: CandidateSource::Prediction,
            });
        }

        for action in [Action::Rest, Action::Explore] {
            let score = self.drive_bonus(action, drives, traits);
            if score > 0.0 {
                out.push(Candidate { action, score, focus: None, source: CandidateSource::Drive });
            }
        }

        out
    }

    /// Pick the best candidate.  `None` means Idle: nothing to choose from,
    /// or nothing scored above zero.
    pub fn select(
        &self,
        candidates: &[Candidate],
        successes:  &SuccessLog,
        rng:        &mut AgentRng,
    ) -> Selection {
        let best = candidates
            .iter()
            .map(|c| c.score)
            .filter(|s| s.is_finite())
            .fold(f32::NEG_INFINITY, f32::max);
        if !(best > 0.0) {
            return Selection { candidate: None };
        }

        let eps = self.cfg.tie_epsilon;
        let mut tied: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| c.score.is_finite() && best - c.score <= eps)
            .collect();

        let min_cost = tied.iter().map(|c| c.action.energy_cost()).min().unwrap_or(0);
        tied.retain(|c| c.action.energy_cost() == min_cost);

        let recency = |c: &Candidate| c.action.target().and_then(|t| successes.last(t));
        let latest = tied.iter().map(|c| recency(c)).max().flatten();
        tied.retain(|c| recency(c) == latest);

        let lowest = tied.iter().map(|c| c.action.target()).min().flatten();
        tied.retain(|c| c.action.target() == lowest);

        let pick = if tied.len() > 1 { rng.choose(&tied).copied() } else { tied.first().copied() };
        Selection { candidate: pick.copied() }
    }

    /// Unresolved pressure from the strongest signal not acted upon:
    /// `deferral_rate × max(0, P_top − chosen_score)`, with the layer it is
    /// attributed to.
    pub fn shortfall(
        &self,
        perception:   &Perception,
        weights:      &LayerVec,
        chosen:       Action,
        chosen_score: f32,
    ) -> Option<(f32, Layer)> {
        let acted = chosen.target();
        let top = perception
            .signals
            .iter()
            .filter(|s| s.category != Category::Neutral && Some(s.target) != acted)
            .map(|s| (s.weighted(weights), s))
            .filter(|(p, _)| p.is_finite())
            .max_by(|(pa, sa), (pb, sb)| pa.total_cmp(pb).then_with(|| sb.target.cmp(&sa.target)))?;

        let (p_top, signal) = top;
        let amount = self.cfg.deferral_rate * (p_top - chosen_score).max(0.0);
        let layer = signal.local.dominant()?;
        (amount > 0.0).then_some((amount, layer))
    }
}
