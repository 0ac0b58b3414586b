//! Error taxonomy for the simulator.
//!
//! Every error is fatal to the run: a simulation is only meaningful as a
//! complete, reproducible trace, so nothing is retried and no partial
//! output is produced.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Malformed or unreadable process descriptor source. Raised before
    /// the simulation starts.
    #[error("input error: {0}")]
    Input(String),

    /// Invalid run configuration (bad policy token, non-positive memory
    /// size or quantum). Raised before the simulation starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// A simulation invariant was violated mid-run: memory deadlock with
    /// no evictable victim, remaining-time underflow, or a context
    /// pointing at a terminated process.
    #[error("simulation invariant violated: {0}")]
    Invariant(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
