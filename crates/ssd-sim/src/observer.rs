//! Simulation observer trait for progress reporting and data collection.

use ssd_core::Tick;

use crate::{SimSnapshot, TickReport};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: leap counter
///
/// ```rust,ignore
/// struct LeapCounter(usize);
///
/// impl SimObserver for LeapCounter {
///     fn on_tick_end(&mut self, report: &TickReport) {
///         self.0 += report.leaps;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after each tick commits.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// Called every `config.output_interval_ticks` ticks with read-only
    /// access to the committed state, so output writers can record it without
    /// the sim knowing about any specific format.
    fn on_snapshot(&mut self, _snapshot: &SimSnapshot<'_>) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
