//! Error handling for the datrie library
//!
//! Only fallible surfaces return errors: snapshot persistence, configuration
//! loading and integrity verification. Misusing the build/query lifecycle is a
//! programmer error and panics instead.

use thiserror::Error;

/// Main error type for the datrie library
#[derive(Error, Debug)]
pub enum DatrieError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid data format or corruption in persisted input
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Error message describing the issue
        message: String,
    },

    /// Operation not permitted in the trie's current lifecycle phase
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the phase mismatch
        message: String,
    },

    /// Node table or tail store invariant broken
    #[error("Corrupted trie at node {node}: {message}")]
    Corrupted {
        /// Node id where the breakage was detected
        node: i32,
        /// What invariant failed
        message: String,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },

    /// Snapshot encoding/decoding failures
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message from the codec
        message: String,
    },
}

impl DatrieError {
    /// Create an invalid data error
    pub fn invalid_data<S: Into<String>>(message: S) -> Self {
        Self::InvalidData { message: message.into() }
    }

    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        Self::InvalidState { message: message.into() }
    }

    /// Create a corruption error
    pub fn corrupted<S: Into<String>>(node: i32, message: S) -> Self {
        Self::Corrupted { node, message: message.into() }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization { message: message.into() }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::InvalidState { .. } => true,
            Self::InvalidData { .. } => false,
            Self::Corrupted { .. } => false,
            Self::Configuration { .. } => false,
            Self::Serialization { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::InvalidData { .. } => "data",
            Self::InvalidState { .. } => "state",
            Self::Corrupted { .. } => "corruption",
            Self::Configuration { .. } => "config",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<bincode::Error> for DatrieError {
    fn from(err: bincode::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DatrieError>;
