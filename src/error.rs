//! Error types
//!
//! Simulation errors are contract violations. The frame entry points guard
//! against them up front and clamp state instead of returning them, so they
//! only surface from the pure helpers and from `GameSession::check_invariants`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Validation(String),
}
