//! Scenario orchestrators and SPMD runner for the colfs harness
//!
//! Two scenarios, built from the same primitives:
//! - `split_group_access`: partitions the world by rank parity and runs a
//!   full collective create/close/delete cycle in the acting sub-group
//!   while the passive sub-group only synchronizes. Pass criterion is
//!   termination; a structural barrier mismatch shows up as a hang.
//! - `policy_propagation`: drives the create → reopen → explicit-open →
//!   persisted-query lifecycle on the world group and checks the access
//!   policy flags at every stage.
//!
//! The runner spawns one thread per rank and applies a wall-clock watchdog
//! so that a hang becomes a failure report instead of a stuck process.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod propagation;
pub mod runner;
pub mod scenario;
pub mod split_access;

pub use propagation::policy_propagation;
pub use runner::{run_scenario, run_scenario_with_watchdog, RankContext, WorldReport, DEFAULT_WATCHDOG};
pub use scenario::{
    lookup, names, run_named, run_named_with_watchdog, ScenarioFn, POLICY_PROPAGATION,
    SPLIT_GROUP_ACCESS,
};
pub use split_access::split_group_access;
