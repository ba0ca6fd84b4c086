//! Error category enum.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse classification of where a failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Infrastructure-caused failure (nodes, scheduler, database, Docker).
    System,
    /// Failure caused by the job's own logic.
    Algorithm,
}

impl ErrorCategory {
    /// Every category, in display order.
    pub const ALL: [ErrorCategory; 2] = [Self::System, Self::Algorithm];

    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "SYSTEM",
            Self::Algorithm => "ALGORITHM",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SYSTEM" => Ok(Self::System),
            "ALGORITHM" => Ok(Self::Algorithm),
            other => Err(CoreError::UnknownCategory(other.to_string())),
        }
    }
}
