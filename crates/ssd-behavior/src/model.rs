//! The `BehaviorModel` trait and the layered decision model.

use tracing::trace;

use ssd_core::{AgentId, AgentRng, Position};

use crate::{Action, Alignment, Decision, LeapTrigger, TickContext, perceive};

/// Pluggable agent decision-making.
///
/// Called once per living agent per tick during the compute phase with a
/// read-only [`TickContext`] and the agent's own [`AgentRng`], so the result
/// does not depend on thread scheduling or agent order.
///
/// # Thread safety
///
/// The simulation may call `decide` for many agents in parallel via Rayon,
/// so implementations must be `Send + Sync` and keep per-agent state in the
/// store, not in the model.
pub trait BehaviorModel: Send + Sync + 'static {
    fn decide(&self, agent: AgentId, ctx: &TickContext<'_>, rng: &mut AgentRng) -> Decision;
}

/// A model that never acts.  Agents stand still; drives still drift.
pub struct IdleBehavior;

impl BehaviorModel for IdleBehavior {
    fn decide(&self, agent: AgentId, ctx: &TickContext<'_>, _rng: &mut AgentRng) -> Decision {
        let i = agent.index();
        Decision::idle(agent, ctx.agents.pressure[i], ctx.agents.weights[i])
    }
}

/// The layered pressure → coherence → alignment → leap pipeline.
#[derive(Default)]
pub struct SsdBehavior;

impl BehaviorModel for SsdBehavior {
    fn decide(&self, agent: AgentId, ctx: &TickContext<'_>, rng: &mut AgentRng) -> Decision {
        let i = agent.index();
        let store = ctx.agents;
        let mut pressure = store.pressure[i];
        let mut weights = store.weights[i];

        if !store.is_alive(agent) {
            return Decision::idle(agent, pressure, weights);
        }

        let cfg = ctx.config;
        let perception = perceive(agent, ctx);
        pressure.layers = perception.total;

        let align = Alignment::new(&cfg.alignment);
        let candidates = align.candidates(
            &perception,
            &weights,
            &store.drives[i],
            &store.personality[i],
            |t| ctx.coherence.get(agent, t),
        );

        let (chosen, reflex) = match perception.reflex {
            Some(r) => {
                let action = Action::Flee(r.target);
                let score = candidates
                    .iter()
                    .find(|c| c.action == action)
                    .map_or(0.0, |c| c.score);
                (Some((action, score, Some(r.position))), true)
            }
            None => {
                let sel = align.select(&candidates, &store.successes[i], rng);
                (sel.candidate.map(|c| (c.action, c.score, c.focus)), false)
            }
        };
        let (action, score, mut focus) = chosen.unwrap_or((Action::Idle, 0.0, None));

        if action == Action::Explore {
            let heading: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
            let step = cfg.world.move_speed;
            focus = Some(store.position[i].offset(heading.cos() * step, heading.sin() * step));
        }

        // A frightened member runs toward its nearest boundary-mate.
        if let (Action::Flee(_), Some(threat)) = (action, focus) {
            let a = &cfg.alignment;
            if store.drives[i].fear > a.shelter_fear {
                if let Some(ally) = ctx.nearest_ally(agent, a.shelter_radius) {
                    focus = Some(shelter_focus(store.position[i], threat, ally));
                }
            }
        }

        if let Some((amount, layer)) = align.shortfall(&perception, &weights, action, score) {
            pressure.defer(amount, layer);
        }

        let leap = LeapTrigger::new(&cfg.leap).evaluate(agent, &mut pressure, &mut weights, ctx.tick);

        trace!(
            %agent,
            tick = %ctx.tick,
            action = %action.kind(),
            score,
            reflex,
            unresolved = pressure.unresolved,
            "decide"
        );

        Decision {
            agent,
            action,
            score,
            focus,
            reflex,
            candidates: candidates.len(),
            pressure,
            weights,
            leap,
        }
    }
}

/// The point to flee from so that the step leads away from `threat` and
/// toward `ally` in equal parts.  Falls back to `threat` when the two pulls
/// cancel.
pub(crate) fn shelter_focus(here: Position, threat: Position, ally: Position) -> Position {
    let unit = |dx: f32, dy: f32| {
        let d = dx.hypot(dy);
        if d > 0.0 { (dx / d, dy / d) } else { (0.0, 0.0) }
    };
    let away = unit(here.x - threat.x, here.y - threat.y);
    let toward = unit(ally.x - here.x, ally.y - here.y);
    let (dx, dy) = (away.0 + toward.0, away.1 + toward.1);
    if dx.hypot(dy) < 1e-3 {
        return threat;
    }
    here.offset(-dx, -dy)
}
