//! Framework error type.
//!
//! Only two things are allowed to fail loudly in this framework: building a
//! simulation from an invalid configuration, and I/O performed by
//! collaborators.  Everything that happens inside a tick degrades to a
//! neutral value instead of returning an error.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `ssd-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum SsdError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    /// A configuration value lies outside its valid domain.  `field` is the
    /// dotted path of the offending value (e.g. `coherence.decay`).
    #[error("configuration error: {field}: {reason}")]
    Config {
        field:  &'static str,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `ssd-*` crates.
pub type SsdResult<T> = Result<T, SsdError>;
