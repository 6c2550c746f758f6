//! Error types for the beat tracking engine

use std::fmt;

/// Errors that can occur during beat tracking
#[derive(Debug, Clone)]
pub enum TrackerError {
    /// Configuration rejected at session initialization
    InvalidConfig(String),

    /// Invalid per-frame input (e.g. band count mismatch)
    InvalidInput(String),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            TrackerError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for TrackerError {}
