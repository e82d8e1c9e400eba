//! This module defines all error types used throughout the application.

use crate::automaton::{Label, StateId};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The label sequence provider could not process the input text
    #[error("Tagging error: {0}")]
    Tagging(String),

    /// Tagging model could not be loaded
    #[error("Failed to load tagging model {path:?}: {message}")]
    ModelLoad { path: PathBuf, message: String },

    /// Out-of-process execution backend failed to produce a verdict
    #[error("Execution engine error: {0}")]
    EngineInvocation(String),

    /// Learning would make the automaton nondeterministic
    #[error(
        "Automaton conflict: ({from}, {label}) already leads to {existing}, cannot also lead to {attempted}"
    )]
    AutomatonConflict {
        from: StateId,
        label: Label,
        existing: StateId,
        attempted: StateId,
    },

    /// An empty label sequence can never be accepted, so it cannot be learned
    #[error("Cannot learn an empty label sequence")]
    EmptySequence,

    /// Malformed rule string (expected `<from> <label> <to>`)
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// Export destination is unwritable
    #[error("Failed to export grammar to {path:?}: {message}")]
    Export { path: PathBuf, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a tagging error
    pub fn tagging(msg: impl Into<String>) -> Self {
        Self::Tagging(msg.into())
    }

    /// Create an engine invocation error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::EngineInvocation(msg.into())
    }

    /// Create an invalid rule error
    pub fn invalid_rule(msg: impl Into<String>) -> Self {
        Self::InvalidRule(msg.into())
    }

    /// Whether this error must end the whole session rather than one text or sentence
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ModelLoad { .. } | Error::Export { .. } | Error::Config(_)
        )
    }
}

// Implement From traits for common external error types

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Custom(format!("JSON error: {}", err))
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}
