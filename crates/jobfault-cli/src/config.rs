//! CLI configuration.

use std::path::PathBuf;

/// Registry loading and logging configuration.
pub struct Config {
    /// Seed the embedded builtin fixture before any fixture files.
    pub include_builtin: bool,

    /// Extra fixture files, seeded in order after the builtin fixture.
    pub fixture_paths: Vec<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_builtin: true,
            fixture_paths: Vec::new(),
            log_filter: "info".to_string(),
        }
    }
}
