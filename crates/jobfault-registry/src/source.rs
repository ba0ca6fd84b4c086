//! Where error definitions are loaded from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use jobfault_core::{builtin_definitions, parse_fixture, ErrorDefinition};

use crate::RegistryError;

/// A provider of validated error definitions.
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    /// Short description for logs.
    fn describe(&self) -> String;

    /// Load every definition, failing if any record is invalid.
    async fn load(&self) -> Result<Vec<ErrorDefinition>, RegistryError>;
}

/// The builtin fixture compiled into `jobfault-core`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

#[async_trait]
impl DefinitionSource for EmbeddedSource {
    fn describe(&self) -> String {
        "builtin".to_string()
    }

    async fn load(&self) -> Result<Vec<ErrorDefinition>, RegistryError> {
        Ok(builtin_definitions()?)
    }
}

/// A fixture document on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DefinitionSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<Vec<ErrorDefinition>, RegistryError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| RegistryError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), bytes = text.len(), "Read fixture file");

        let defs = parse_fixture(&text).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Rejected fixture file");
            e
        })?;
        Ok(defs)
    }
}
