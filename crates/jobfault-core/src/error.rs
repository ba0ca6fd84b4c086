//! Core domain errors.

use thiserror::Error;

/// Core domain errors for jobfault.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Error name is not a lowercase, hyphenated identifier.
    #[error("Invalid error name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Category outside the closed SYSTEM/ALGORITHM set.
    #[error("Unknown error category: {0}")]
    UnknownCategory(String),

    /// A definition failed field validation.
    #[error("Invalid error definition '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },

    /// A fixture record could not be decoded or validated.
    #[error("Invalid fixture record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// A fixture record repeats a name used by an earlier record.
    #[error("Duplicate error name '{name}' at fixture record #{index}")]
    DuplicateName { name: String, index: usize },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
