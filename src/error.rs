//! Error types
//!
//! Geometric degeneracies are handled by policy inside the simulation; only
//! configuration problems surface as errors.

use thiserror::Error;

use crate::sim::AgentId;

/// Rejected agent or flock configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be finite")]
    NonFinite { name: &'static str },
    #[error("agent id {0} is already in the flock")]
    DuplicateAgent(AgentId),
}

/// Failure to load settings from disk or JSON.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}
