//! `ssd-social`: group structure that emerges from coherence.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`boundary`] | `BoundaryTracker`, `Boundary`, `BoundaryEvent`               |
//! | [`hunting`]  | `HuntRegistry`, `HuntGroup`, `Hunter`, `HuntResult`          |
//!
//! Both modules read κ only through a mutual-coherence lookup
//! (`Fn(AgentId, AgentId) -> f32`, normally `CoherenceStore::mutual`) and
//! never touch the decision core's internals.  Both are driven from the
//! sequential commit phase.

pub mod boundary;
pub mod hunting;

#[cfg(test)]
mod tests;

pub use boundary::{Boundary, BoundaryEvent, BoundaryTracker};
pub use hunting::{HuntGroup, HuntRegistry, HuntReport, HuntResult, Hunter, hunters_from};
