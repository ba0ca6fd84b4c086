//! Error definition record.

use crate::{CoreError, ErrorCategory, ErrorName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of an error title.
pub const MAX_TITLE_LEN: usize = 50;

/// A named error that job failures can be tagged with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorDefinition {
    /// Unique machine key.
    pub name: ErrorName,

    /// Short human-readable label.
    pub title: String,

    /// Explanation of the failure, possibly with remediation guidance.
    pub description: String,

    /// Where the failure originated.
    pub category: ErrorCategory,

    /// Shipped with the platform rather than created by a user.
    pub is_builtin: bool,

    /// Whether a failure tagged with this error is eligible for automatic retry.
    pub should_be_retried: bool,

    /// When the definition was created.
    pub created: DateTime<Utc>,

    /// When the definition was last changed.
    pub last_modified: DateTime<Utc>,
}

impl ErrorDefinition {
    /// Create a platform-defined error, not retried by default.
    pub fn builtin(
        name: ErrorName,
        title: impl Into<String>,
        description: impl Into<String>,
        category: ErrorCategory,
    ) -> Self {
        Self::new(name, title, description, category, true)
    }

    /// Create a user-defined error, not retried by default.
    pub fn user_defined(
        name: ErrorName,
        title: impl Into<String>,
        description: impl Into<String>,
        category: ErrorCategory,
    ) -> Self {
        Self::new(name, title, description, category, false)
    }

    fn new(
        name: ErrorName,
        title: impl Into<String>,
        description: impl Into<String>,
        category: ErrorCategory,
        is_builtin: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            name,
            title: title.into(),
            description: description.into(),
            category,
            is_builtin,
            should_be_retried: false,
            created: now,
            last_modified: now,
        }
    }

    /// Builder method to set retry eligibility.
    pub fn with_retry(mut self, should_be_retried: bool) -> Self {
        self.should_be_retried = should_be_retried;
        self
    }

    /// Builder method to set provenance timestamps (useful for testing).
    pub fn with_timestamps(mut self, created: DateTime<Utc>, last_modified: DateTime<Utc>) -> Self {
        self.created = created;
        self.last_modified = last_modified;
        self
    }

    /// Whether failures tagged with this error may be retried automatically.
    pub fn is_retryable(&self) -> bool {
        self.should_be_retried
    }

    /// Check field constraints that the type system does not enforce.
    pub fn validate(&self) -> Result<(), CoreError> {
        let invalid = |reason: &str| CoreError::InvalidDefinition {
            name: self.name.to_string(),
            reason: reason.to_string(),
        };

        if self.title.trim().is_empty() {
            return Err(invalid("title is empty"));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(invalid("title is longer than 50 characters"));
        }
        if self.description.trim().is_empty() {
            return Err(invalid("description is empty"));
        }
        if self.last_modified < self.created {
            return Err(invalid("last_modified is earlier than created"));
        }
        Ok(())
    }
}
