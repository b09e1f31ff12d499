//! `ssd-behavior`: the protected decision core.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`propagator`]  | `Propagator`, `Relation`: four-layer signal propagation       |
//! | [`coherence`]   | `CoherenceStore`, `Outcome`, `OutcomeKind`: κ memory          |
//! | [`prediction`]  | `PredictionStore`, `Track`, `Prediction`: foresight           |
//! | [`perception`]  | `perceive`, `Perception`, `TargetSignal`                      |
//! | [`alignment`]   | `Alignment`: candidate scoring and selection                  |
//! | [`leap`]        | `LeapTrigger`: layer-weight reorganization                    |
//! | [`action`]      | `Action`, `Candidate`, `Decision`, `LeapEvent`                |
//! | [`context`]     | `TickContext<'a>`: read-only tick snapshot                    |
//! | [`model`]       | `BehaviorModel` trait, `SsdBehavior`, `IdleBehavior`          |
//!
//! # Dependency direction
//!
//! This crate depends only on `ssd-core`, `ssd-agent` and `ssd-spatial`.
//! Peripheral crates (social, sim, output) adapt to its public API and never
//! the other way round.
//!
//! # Two phases
//!
//! 1. **Compute** (parallelizable): `BehaviorModel::decide` for every living
//!    agent against a read-only [`TickContext`].  Produces a [`Decision`].
//! 2. **Commit** (sequential, in ssd-sim): decisions are applied, outcomes
//!    update the [`CoherenceStore`], and observations feed the
//!    [`PredictionStore`].

pub mod action;
pub mod alignment;
pub mod coherence;
pub mod context;
pub mod leap;
pub mod model;
pub mod perception;
pub mod prediction;
pub mod propagator;


pub use action::{Action, ActionKind, Candidate, CandidateSource, Decision, LeapEvent};
pub use alignment::{Alignment, Selection};
pub use coherence::{CoherenceStore, Outcome, OutcomeKind};
pub use context::TickContext;
pub use leap::LeapTrigger;
pub use model::{BehaviorModel, IdleBehavior, SsdBehavior};
pub use perception::{perceive, Perception, PredictedThreat, Reflex, TargetSignal};
pub use prediction::{Prediction, PredictionStore, Track};
pub use propagator::{LayerResponse, Propagator, Relation};
