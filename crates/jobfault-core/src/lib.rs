//! jobfault Core Domain Types
//!
//! This crate contains the error-definition model of the job platform with
//! no dependencies on:
//! - Async runtimes
//! - Filesystem access
//! - Storage backends
//!
//! The builtin fixture that seeds every registry is embedded here.

pub mod builtin;
pub mod category;
pub mod definition;
pub mod error;
pub mod fixture;
pub mod name;

// Re-export commonly used types
pub use builtin::{builtin_definitions, BUILTIN_FIXTURE};
pub use category::ErrorCategory;
pub use definition::ErrorDefinition;
pub use error::CoreError;
pub use fixture::{parse_fixture, to_fixture_string, FIXTURE_MODEL};
pub use name::ErrorName;
