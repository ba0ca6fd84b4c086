//! Listing filters and ordering.

use chrono::{DateTime, Utc};
use jobfault_core::{ErrorCategory, ErrorDefinition};

/// Sort key for listed definitions. Ties are broken by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorOrder {
    #[default]
    Name,
    Title,
    LastModified,
}

/// Criteria for [`ErrorRegistry::list`](crate::ErrorRegistry::list).
///
/// Unset criteria match everything. The modification window is inclusive on
/// both ends.
#[derive(Debug, Clone, Default)]
pub struct ErrorFilter {
    pub category: Option<ErrorCategory>,
    pub is_builtin: Option<bool>,
    pub modified_since: Option<DateTime<Utc>>,
    pub modified_until: Option<DateTime<Utc>>,
    pub order: ErrorOrder,
}

impl ErrorFilter {
    /// Filter matching every definition, ordered by name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to restrict to one category.
    pub fn with_category(mut self, category: ErrorCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Builder method to restrict to builtin or user-defined errors.
    pub fn with_builtin(mut self, is_builtin: bool) -> Self {
        self.is_builtin = Some(is_builtin);
        self
    }

    /// Builder method to restrict the `last_modified` window.
    pub fn with_modified_between(
        mut self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Self {
        self.modified_since = since;
        self.modified_until = until;
        self
    }

    /// Builder method to set the ordering.
    pub fn with_order(mut self, order: ErrorOrder) -> Self {
        self.order = order;
        self
    }

    /// Check whether a definition passes every set criterion.
    pub fn matches(&self, def: &ErrorDefinition) -> bool {
        self.category.map_or(true, |c| def.category == c)
            && self.is_builtin.map_or(true, |b| def.is_builtin == b)
            && self.modified_since.map_or(true, |t| def.last_modified >= t)
            && self.modified_until.map_or(true, |t| def.last_modified <= t)
    }

    /// Sort definitions in place by this filter's ordering.
    pub fn sort(&self, defs: &mut [ErrorDefinition]) {
        match self.order {
            ErrorOrder::Name => defs.sort_by(|a, b| a.name.cmp(&b.name)),
            ErrorOrder::Title => {
                defs.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.name.cmp(&b.name)))
            }
            ErrorOrder::LastModified => defs.sort_by(|a, b| {
                a.last_modified
                    .cmp(&b.last_modified)
                    .then_with(|| a.name.cmp(&b.name))
            }),
        }
    }
}
