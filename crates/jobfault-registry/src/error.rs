//! Error types for the registry.

use std::path::PathBuf;

use jobfault_core::CoreError;
use thiserror::Error;

/// Errors that can occur when loading or querying the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No definition with this name.
    #[error("error definition not found: {0}")]
    NotFound(String),

    /// A definition with this name is already registered.
    #[error("duplicate error name: {0}")]
    DuplicateName(String),

    /// A seed record and the stored definition disagree on `is_builtin`.
    #[error("cannot seed {incoming} error '{name}' over an existing {existing} error")]
    NameConflict {
        name: String,
        incoming: &'static str,
        existing: &'static str,
    },

    /// Builtin definitions can only change through seeding.
    #[error("builtin error '{0}' cannot be edited")]
    BuiltinImmutable(String),

    /// Definition or fixture failed validation.
    #[error("invalid definition: {0}")]
    Invalid(#[source] CoreError),

    /// Failed to read or write a fixture file.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<CoreError> for RegistryError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DuplicateName { name, .. } => Self::DuplicateName(name),
            other => Self::Invalid(other),
        }
    }
}
