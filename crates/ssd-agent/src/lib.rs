//! `ssd-agent`: Structure-of-Arrays agent storage for the `ssd` framework.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`store`]       | `AgentStore` (SoA arrays), `AgentRngs` (per-agent RNG)     |
//! | [`drives`]      | `Drives`, `Activity`: need dynamics (hunger, fear, …)      |
//! | [`personality`] | `Personality`: fixed traits and village presets            |
//! | [`pressure`]    | `PressureAccumulator`, `SuccessLog`                        |
//! | [`builder`]     | `AgentStoreBuilder` (fluent construction)                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types. |

pub mod builder;
pub mod drives;
pub mod personality;
pub mod pressure;
pub mod store;

#[cfg(test)]
mod tests;

pub use builder::AgentStoreBuilder;
pub use drives::{Activity, Drives};
pub use personality::Personality;
pub use pressure::{PressureAccumulator, SuccessLog};
pub use store::{AgentRngs, AgentSeed, AgentStore};
