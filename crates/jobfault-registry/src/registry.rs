//! Shared error registry.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use jobfault_core::{to_fixture_string, ErrorCategory, ErrorDefinition, ErrorName};

use crate::{DefinitionSource, ErrorFilter, RegistryError};

/// Outcome of a seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Names that were not registered before.
    pub created: usize,
    /// Names whose stored definition was replaced.
    pub updated: usize,
    /// Names whose stored definition was already identical.
    pub unchanged: usize,
}

impl SeedReport {
    /// Total number of records processed.
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged
    }
}

/// Partial update of a user-defined error. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct ErrorEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ErrorCategory>,
    pub should_be_retried: Option<bool>,
}

impl ErrorEdit {
    /// Builder method to set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the category.
    pub fn category(mut self, category: ErrorCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Builder method to set retry eligibility.
    pub fn should_be_retried(mut self, should_be_retried: bool) -> Self {
        self.should_be_retried = Some(should_be_retried);
        self
    }

    fn apply(self, def: &mut ErrorDefinition) {
        if let Some(title) = self.title {
            def.title = title;
        }
        if let Some(description) = self.description {
            def.description = description;
        }
        if let Some(category) = self.category {
            def.category = category;
        }
        if let Some(retry) = self.should_be_retried {
            def.should_be_retried = retry;
        }
    }
}

/// In-memory registry of error definitions, keyed by name.
///
/// Multi-record mutations are validated in full and applied under a single
/// write lock, so readers never observe a partially applied batch.
pub struct ErrorRegistry {
    entries: RwLock<HashMap<ErrorName, ErrorDefinition>>,
}

impl ErrorRegistry {
    /// Create an empty registry wrapped in Arc.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert new definitions. Fails without changes if any name is already
    /// registered, repeated within the batch, or any record is invalid.
    pub async fn register(&self, defs: Vec<ErrorDefinition>) -> Result<usize, RegistryError> {
        let mut entries = self.entries.write().await;

        let mut batch = HashSet::with_capacity(defs.len());
        for def in &defs {
            def.validate()?;
            if entries.contains_key(&def.name) || !batch.insert(&def.name) {
                return Err(RegistryError::DuplicateName(def.name.to_string()));
            }
        }

        let count = defs.len();
        for def in defs {
            entries.insert(def.name.clone(), def);
        }

        info!(count, "Registered error definitions");
        Ok(count)
    }

    /// Upsert definitions keyed by name.
    ///
    /// Seeding the same data twice is a no-op. A record may replace a stored
    /// definition only if both agree on `is_builtin`; otherwise the whole
    /// batch fails with [`RegistryError::NameConflict`].
    pub async fn seed(&self, defs: Vec<ErrorDefinition>) -> Result<SeedReport, RegistryError> {
        let mut entries = self.entries.write().await;

        let mut batch = HashSet::with_capacity(defs.len());
        for def in &defs {
            def.validate()?;
            if !batch.insert(&def.name) {
                return Err(RegistryError::DuplicateName(def.name.to_string()));
            }
            if let Some(existing) = entries.get(&def.name) {
                if existing.is_builtin != def.is_builtin {
                    return Err(RegistryError::NameConflict {
                        name: def.name.to_string(),
                        incoming: origin(def.is_builtin),
                        existing: origin(existing.is_builtin),
                    });
                }
            }
        }

        let mut report = SeedReport::default();
        for def in defs {
            match entries.get(&def.name) {
                Some(existing) if *existing == def => {
                    report.unchanged += 1;
                    continue;
                }
                Some(_) => {
                    debug!(name = %def.name, "Replacing error definition");
                    report.updated += 1;
                }
                None => report.created += 1,
            }
            entries.insert(def.name.clone(), def);
        }

        info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            "Seeded error definitions"
        );
        Ok(report)
    }

    /// Load definitions from a source and seed them.
    pub async fn seed_from(
        &self,
        source: &dyn DefinitionSource,
    ) -> Result<SeedReport, RegistryError> {
        let defs = source.load().await?;
        debug!(source = %source.describe(), count = defs.len(), "Loaded error definitions");
        self.seed(defs).await
    }

    /// Get a definition by name.
    pub async fn lookup(&self, name: &str) -> Result<ErrorDefinition, RegistryError> {
        self.entries
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Get a builtin definition by name. User-defined errors are not found.
    pub async fn get_builtin_error(&self, name: &str) -> Result<ErrorDefinition, RegistryError> {
        let entries = self.entries.read().await;
        match entries.get(name) {
            Some(def) if def.is_builtin => Ok(def.clone()),
            _ => Err(RegistryError::NotFound(name.to_string())),
        }
    }

    /// Whether failures tagged with `name` are eligible for automatic retry.
    pub async fn should_retry(&self, name: &str) -> Result<bool, RegistryError> {
        self.lookup(name).await.map(|def| def.is_retryable())
    }

    /// Create a user-defined error.
    pub async fn create_error(
        &self,
        name: ErrorName,
        title: impl Into<String>,
        description: impl Into<String>,
        category: ErrorCategory,
        should_be_retried: bool,
    ) -> Result<ErrorDefinition, RegistryError> {
        let def = ErrorDefinition::user_defined(name, title, description, category)
            .with_retry(should_be_retried);
        def.validate()?;

        let mut entries = self.entries.write().await;
        if entries.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name.to_string()));
        }
        entries.insert(def.name.clone(), def.clone());

        info!(name = %def.name, category = %def.category, "Created error definition");
        Ok(def)
    }

    /// Edit a user-defined error. Builtin errors are immutable here.
    pub async fn edit_error(
        &self,
        name: &str,
        edit: ErrorEdit,
    ) -> Result<ErrorDefinition, RegistryError> {
        let mut entries = self.entries.write().await;
        let stored = entries
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        if stored.is_builtin {
            return Err(RegistryError::BuiltinImmutable(name.to_string()));
        }

        let mut updated = stored.clone();
        edit.apply(&mut updated);
        updated.last_modified = Utc::now().max(updated.created);
        updated.validate()?;

        *stored = updated.clone();
        debug!(name, "Edited error definition");
        Ok(updated)
    }

    /// List definitions matching `filter`, in the filter's order.
    pub async fn list(&self, filter: &ErrorFilter) -> Vec<ErrorDefinition> {
        let mut defs: Vec<ErrorDefinition> = self
            .entries
            .read()
            .await
            .values()
            .filter(|def| filter.matches(def))
            .cloned()
            .collect();
        filter.sort(&mut defs);
        defs
    }

    /// Serialize every definition, sorted by name, as a fixture document.
    pub async fn export_fixture(&self) -> Result<String, RegistryError> {
        let defs = self.list(&ErrorFilter::new()).await;
        Ok(to_fixture_string(&defs)?)
    }

    /// Get the number of registered definitions.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn origin(is_builtin: bool) -> &'static str {
    if is_builtin {
        "builtin"
    } else {
        "user-defined"
    }
}

impl Default for ErrorRegistry {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}
