//! Platform-defined errors shipped with every installation.

use crate::{parse_fixture, CoreError, ErrorDefinition};

/// The builtin error fixture, embedded at compile time.
pub const BUILTIN_FIXTURE: &str = include_str!("../fixtures/builtin_errors.json");

/// Parse the embedded builtin fixture.
pub fn builtin_definitions() -> Result<Vec<ErrorDefinition>, CoreError> {
    parse_fixture(BUILTIN_FIXTURE)
}
