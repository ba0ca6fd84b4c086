//! jobfault Error Registry
//!
//! Holds the platform's error definitions in memory and exposes
//! lookup-by-name to the rest of the platform. Builtin definitions are
//! seeded from fixtures; user-defined ones are created and edited at runtime.

pub mod error;
pub mod filter;
pub mod registry;
pub mod source;

pub use error::RegistryError;
pub use filter::{ErrorFilter, ErrorOrder};
pub use registry::{ErrorEdit, ErrorRegistry, SeedReport};
pub use source::{DefinitionSource, EmbeddedSource, FileSource};
