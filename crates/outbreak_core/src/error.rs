//! Error types for the simulation core.
//!
//! Only the driver surface can fail. Everything that happens inside a tick
//! (vanished targets, unaffordable spawns, zero-length movement) is an
//! expected outcome and is expressed with `Option` instead.

use thiserror::Error;

/// Errors surfaced by the [`World`](crate::world::World) driver API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// The caller passed a negative, NaN or infinite tick delta.
    #[error("Invalid elapsed time: {0}")]
    InvalidElapsed(f64),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

impl From<anyhow::Error> for SimError {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(format!("{err:#}"))
    }
}
