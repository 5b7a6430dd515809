//! Scenario configuration
//!
//! Target path and verbosity are explicit parameters threaded through each
//! orchestrator rather than process-global test state, so scenarios stay
//! independently runnable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a single scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Target container path shared by all ranks
    path: PathBuf,
    /// Emit per-phase info logging
    verbose: bool,
}

impl ScenarioConfig {
    /// Create a configuration for the given target path (quiet by default)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ScenarioConfig {
            path: path.into(),
            verbose: false,
        }
    }

    /// Enable or disable per-phase info logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Target container path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether per-phase info logging is enabled
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}
