use ssd_core::SsdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] SsdError),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("decision for {agent} is invalid: {reason}")]
    InvalidDecision {
        agent:  ssd_core::AgentId,
        reason: &'static str,
    },

    #[error("could not build thread pool: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimError>;
