//! Build errors for machine and coordinator builders.

use crate::config::ConfigError;
use crate::core::RosterError;
use thiserror::Error;

/// Errors that can occur when building a spin machine or coordinator.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Invalid participant: {0}")]
    InvalidParticipant(#[from] RosterError),

    #[error("No tokio runtime available. Build the coordinator from within a runtime")]
    NoRuntime,
}
