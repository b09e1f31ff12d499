//! Plain data row types written by output backends.

use ssd_behavior::ActionKind;
use ssd_core::Layer;
use ssd_sim::{AgentView, TickReport};

/// One living agent's state at a snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id:   u32,
    pub tick:       u64,
    pub x:          f32,
    pub y:          f32,
    pub health:     f32,
    pub hunger:     f32,
    pub fatigue:    f32,
    pub fear:       f32,
    pub loneliness: f32,
    /// `None` while unaffiliated.
    pub boundary:   Option<u32>,
    pub action:     &'static str,
    pub unresolved: f32,
    pub leaps:      u32,
    /// Layer weights, Physical → Upper.
    pub weights:    [f32; 4],
    pub relations:  u32,
}

impl AgentSnapshotRow {
    pub const HEADER: [&'static str; 18] = [
        "agent_id", "tick", "x", "y", "health", "hunger", "fatigue", "fear", "loneliness",
        "boundary", "action", "unresolved", "leaps", "w_physical", "w_foundation", "w_core",
        "w_upper", "relations",
    ];

    pub fn from_view(tick: u64, v: &AgentView) -> Self {
        Self {
            agent_id:   v.agent.0,
            tick,
            x:          v.position.x,
            y:          v.position.y,
            health:     v.health,
            hunger:     v.drives.hunger,
            fatigue:    v.drives.fatigue,
            fear:       v.drives.fear,
            loneliness: v.drives.loneliness,
            boundary:   v.boundary.map(|b| b.0),
            action:     v.action.kind().as_str(),
            unresolved: v.unresolved,
            leaps:      v.leaps,
            weights:    Layer::ALL.map(|l| v.weights[l]),
            relations:  v.relations as u32,
        }
    }
}

/// Summary statistics for one committed tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummaryRow {
    pub tick:                 u64,
    pub alive:                u64,
    /// Chosen actions, indexed by [`ActionKind::index`].
    pub actions:              [u64; ActionKind::ALL.len()],
    pub leaps:                u64,
    pub boundaries:           u64,
    pub boundaries_formed:    u64,
    pub boundaries_dissolved: u64,
    pub hunts_resolved:       u64,
    pub hunts_succeeded:      u64,
    pub deaths:               u64,
    pub mean_kappa:           Option<f32>,
}

impl TickSummaryRow {
    pub const HEADER: [&'static str; 17] = [
        "tick", "alive", "idle", "rest", "explore", "approach", "forage", "hunt", "flee",
        "leaps", "boundaries", "boundaries_formed", "boundaries_dissolved", "hunts_resolved",
        "hunts_succeeded", "deaths", "mean_kappa",
    ];

    pub fn from_report(report: &TickReport) -> Self {
        Self {
            tick:                 report.tick.0,
            alive:                report.alive as u64,
            actions:              report.actions.map(|n| n as u64),
            leaps:                report.leaps as u64,
            boundaries:           report.boundaries as u64,
            boundaries_formed:    report.boundaries_formed as u64,
            boundaries_dissolved: report.boundaries_dissolved as u64,
            hunts_resolved:       report.hunts_resolved as u64,
            hunts_succeeded:      report.hunts_succeeded as u64,
            deaths:               report.deaths as u64,
            mean_kappa:           report.mean_kappa,
        }
    }
}
