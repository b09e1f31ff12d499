//! `ssd-sim`: tick driver for the ssd decision core.
//!
//! # Two-phase tick
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Snapshot : environment descriptors, validated, plus one per agent;
//!                 spatial index built once.
//!   ② Compute  : BehaviorModel::decide for every living agent against a
//!                 read-only TickContext (parallel with `parallel`).
//!   ③ Commit   : TickCommit assembled (all-or-nothing), then applied in
//!                 ascending AgentId order: movement, interactions, hunting,
//!                 κ decay, prediction, life, boundaries.
//!   ④ Outcomes : Environment::on_outcomes, clock advance.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the compute phase on Rayon's thread pool.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ssd_agent::AgentStoreBuilder;
//! use ssd_behavior::SsdBehavior;
//! use ssd_core::SimConfig;
//! use ssd_sim::{NoopObserver, SimBuilder, StaticWorld};
//!
//! let (store, rngs) = AgentStoreBuilder::new(20, 42).build();
//! let mut sim = SimBuilder::new(config, store, rngs, SsdBehavior, StaticWorld::default())
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod commit;
pub mod environment;
pub mod error;
pub mod observer;
pub mod report;
pub mod sim;


pub use builder::SimBuilder;
pub use environment::{EmptyWorld, Environment, OutcomeEvent, StaticWorld};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use report::{AgentView, SimSnapshot, TickReport};
pub use sim::Sim;
