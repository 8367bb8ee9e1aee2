//! Error type for the city traffic simulation.
//!
//! Map and configuration problems are fatal at load time, API misuse is a
//! recoverable precondition failure, and `Invariant` marks model corruption
//! that the step loop refuses to paper over.

use thiserror::Error;

use super::types::{DestinationId, LightId, Position};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("map error on line {line}: {reason}")]
    Map { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("simulation has not been initialized")]
    NotInitialized,

    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("no road or traffic light at {0}")]
    NoDirection(Position),

    #[error("destination {0} not found")]
    UnknownDestination(DestinationId),

    #[error("traffic light {0} not found")]
    UnknownLight(LightId),

    #[error("simulation invariant violated: {0}")]
    Invariant(String),
}

/// Shorthand result type for the simulation
pub type SimResult<T> = Result<T, SimError>;
