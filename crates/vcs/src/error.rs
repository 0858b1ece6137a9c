use std::path::Path;
use thiserror::Error;

use crate::types::VcsType;

/// Errors that can occur during VCS operations
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Local checkout at {path} is managed by {found}, not {expected}")]
    WrongVcs {
        expected: VcsType,
        found: VcsType,
        path: String,
    },

    #[error("Remote mismatch: requested {requested}, checkout is configured for {configured}")]
    WrongRemote {
        requested: String,
        configured: String,
    },

    #[error("Cannot detect VCS type for: {0}")]
    CannotDetectVcs(String),

    #[error("{0} executable not found or not runnable")]
    NotAvailable(String),

    #[error("Command `{command}` failed: {output}")]
    CommandFailed { command: String, output: String },

    #[error("Unexpected command output: {0}")]
    InvalidOutput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend-specific error: {0}")]
    Backend(String),
}

impl VcsError {
    /// Create a CannotDetectVcs error from a path
    pub fn cannot_detect(path: &Path) -> Self {
        Self::CannotDetectVcs(path.display().to_string())
    }

    /// Create a Backend error from any error type
    pub fn backend<E: std::error::Error>(error: E) -> Self {
        Self::Backend(error.to_string())
    }

    /// Whether this error came from the external tool exiting unsuccessfully
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}
