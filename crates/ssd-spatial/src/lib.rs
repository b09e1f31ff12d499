//! `ssd-spatial`: proximity queries over the flat village world.
//!
//! # Crate layout
//!
//! | Module        | Contents                                             |
//! |---------------|------------------------------------------------------|
//! | [`proximity`] | `ProximityIndex` (R-tree over positioned entries)    |
//!
//! The index is rebuilt once per tick from a snapshot (descriptor positions
//! or agent positions) and then shared read-only across the compute phase.

pub mod proximity;


pub use proximity::ProximityIndex;
