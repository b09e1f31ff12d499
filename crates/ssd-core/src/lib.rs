//! `ssd-core`: foundational types for the `ssd` NPC decision framework.
//!
//! This crate is a dependency of every other `ssd-*` crate.  It intentionally
//! has no `ssd-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ObjectId`, `BoundaryId`, `TargetId`            |
//! | [`geo`]         | `Position`, planar distance and stepping                   |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                            |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global / per-stream)     |
//! | [`layer`]       | `Layer`, `LayerVec`: the four-layer structure              |
//! | [`descriptor`]  | `Category`, `RawDescriptor`, `Descriptor`                  |
//! | [`config`]      | `SsdConfig` and its sections, validation                   |
//! | [`error`]       | `SsdError`, `SsdResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types; needed |
//! |         | to load `SsdConfig` from a file.                           |

pub mod config;
pub mod descriptor;
pub mod error;
pub mod geo;
pub mod ids;
pub mod layer;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    AlignmentConfig, BoundaryConfig, CoherenceConfig, DriveConfig, HuntingConfig, LeapConfig,
    PredictionConfig, PropagationConfig, SsdConfig, WorldConfig,
};
pub use descriptor::{Category, Descriptor, RawDescriptor};
pub use error::{SsdError, SsdResult};
pub use geo::Position;
pub use ids::{AgentId, BoundaryId, ObjectId, TargetId};
pub use layer::{Layer, LayerVec};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
