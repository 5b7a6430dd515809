//! Scenario registry
//!
//! Scenarios are addressed by name so an external runner can dispatch to
//! them individually. Each entry is a plain function from rank context,
//! configuration and engine to a per-rank report.

use std::sync::Arc;
use std::time::Duration;

use colfs_core::{Error, Result, ScenarioConfig, ScenarioReport};
use colfs_engine::StorageEngine;

use crate::propagation::policy_propagation;
use crate::runner::{run_scenario_with_watchdog, RankContext, WorldReport, DEFAULT_WATCHDOG};
use crate::split_access::split_group_access;

/// Name of the split-group access scenario
pub const SPLIT_GROUP_ACCESS: &str = "split_group_access";

/// Name of the policy propagation scenario
pub const POLICY_PROPAGATION: &str = "policy_propagation";

/// Signature of a scenario body
pub type ScenarioFn =
    fn(&RankContext, &ScenarioConfig, &dyn StorageEngine) -> ScenarioReport;

/// All registered scenario names, in dispatch order
pub fn names() -> &'static [&'static str] {
    &[SPLIT_GROUP_ACCESS, POLICY_PROPAGATION]
}

/// Look up a scenario body by name
pub fn lookup(name: &str) -> Option<ScenarioFn> {
    match name {
        SPLIT_GROUP_ACCESS => Some(split_group_access),
        POLICY_PROPAGATION => Some(policy_propagation),
        _ => None,
    }
}

/// Run a registered scenario by name across `size` ranks.
///
/// # Errors
///
/// Returns [`Error::InvalidOperation`] for an unknown scenario name, or a
/// runtime error if the world cannot be set up.
pub fn run_named(
    name: &str,
    size: usize,
    config: &ScenarioConfig,
    engine: Arc<dyn StorageEngine>,
) -> Result<WorldReport> {
    run_named_with_watchdog(name, size, config, engine, DEFAULT_WATCHDOG)
}

/// [`run_named`] with an explicit watchdog deadline
///
/// # Errors
///
/// Same as [`run_named`].
pub fn run_named_with_watchdog(
    name: &str,
    size: usize,
    config: &ScenarioConfig,
    engine: Arc<dyn StorageEngine>,
    watchdog: Duration,
) -> Result<WorldReport> {
    let body = lookup(name)
        .ok_or_else(|| Error::InvalidOperation(format!("unknown scenario '{name}'")))?;
    run_scenario_with_watchdog(name, size, config, engine, watchdog, body)
}
