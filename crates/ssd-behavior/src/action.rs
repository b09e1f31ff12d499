//! Actions, scored candidates, and the per-agent decision record.

use ssd_agent::PressureAccumulator;
use ssd_core::{AgentId, Layer, LayerVec, Position, TargetId, Tick};

/// What an agent does this tick.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Action {
    /// Nothing worth doing.
    #[default]
    Idle,
    Rest,
    Explore,
    /// Seek company of another agent.
    Approach(TargetId),
    /// Gather a resource.
    Forage(TargetId),
    /// Chase prey, alone or in a group.
    Hunt(TargetId),
    /// Move away from a threat.
    Flee(TargetId),
}

/// Fieldless mirror of [`Action`] for histograms and CSV columns.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum ActionKind {
    Idle,
    Rest,
    Explore,
    Approach,
    Forage,
    Hunt,
    Flee,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Idle,
        ActionKind::Rest,
        ActionKind::Explore,
        ActionKind::Approach,
        ActionKind::Forage,
        ActionKind::Hunt,
        ActionKind::Flee,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Idle     => "idle",
            ActionKind::Rest     => "rest",
            ActionKind::Explore  => "explore",
            ActionKind::Approach => "approach",
            ActionKind::Forage   => "forage",
            ActionKind::Hunt     => "hunt",
            ActionKind::Flee     => "flee",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    pub fn kind(self) -> ActionKind {
        match self {
            Action::Idle        => ActionKind::Idle,
            Action::Rest        => ActionKind::Rest,
            Action::Explore     => ActionKind::Explore,
            Action::Approach(_) => ActionKind::Approach,
            Action::Forage(_)   => ActionKind::Forage,
            Action::Hunt(_)     => ActionKind::Hunt,
            Action::Flee(_)     => ActionKind::Flee,
        }
    }

    pub fn target(self) -> Option<TargetId> {
        match self {
            Action::Idle | Action::Rest | Action::Explore => None,
            Action::Approach(t) | Action::Forage(t) | Action::Hunt(t) | Action::Flee(t) => Some(t),
        }
    }

    /// Estimated energy cost; the first tie-break between equal scores.
    pub fn energy_cost(self) -> u8 {
        match self {
            Action::Idle | Action::Rest => 0,
            Action::Approach(_) | Action::Forage(_) | Action::Explore => 1,
            Action::Hunt(_) | Action::Flee(_) => 2,
        }
    }

    /// `true` for actions that move the agent.
    pub fn is_moving(self) -> bool {
        !matches!(self, Action::Idle | Action::Rest)
    }
}

// ── Candidate ─────────────────────────────────────────────────────────────────

/// Where a candidate came from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CandidateSource {
    /// A currently perceived descriptor.
    Signal,
    /// A drive with no specific target (rest, explore).
    Drive,
    /// A tracked threat forecast to come close.
    Prediction,
}

/// A scored option for the alignment selector.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Candidate {
    pub action: Action,
    pub score:  f32,
    /// Position to move toward (or away from, for `Flee`).
    pub focus:  Option<Position>,
    pub source: CandidateSource,
}

// ── Decision ──────────────────────────────────────────────────────────────────

/// A layer-weight reorganization, or the degraded no-op when no dominant
/// layer could be identified.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LeapEvent {
    pub tick:       Tick,
    /// Accumulated unresolved pressure at the moment of the leap.
    pub unresolved: f32,
    /// `None` for a no-op leap.
    pub dominant:   Option<Layer>,
    pub before:     LayerVec,
    pub after:      LayerVec,
}

/// Everything one agent's compute phase produced.  Applied by the commit
/// phase; nothing here has touched shared state yet.
#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub agent:      AgentId,
    pub action:     Action,
    pub score:      f32,
    pub focus:      Option<Position>,
    /// Chosen by reflex, bypassing scoring.
    pub reflex:     bool,
    pub candidates: usize,
    /// Accumulator after this tick's deferral and any leap.
    pub pressure:   PressureAccumulator,
    /// Layer weights after any leap.
    pub weights:    LayerVec,
    pub leap:       Option<LeapEvent>,
}

impl Decision {
    /// An idle decision that leaves the agent's state untouched.
    pub fn idle(agent: AgentId, pressure: PressureAccumulator, weights: LayerVec) -> Self {
        Self {
            agent,
            action: Action::Idle,
            score: 0.0,
            focus: None,
            reflex: false,
            candidates: 0,
            pressure,
            weights,
            leap: None,
        }
    }
}
