//! colfs - collective-operation consistency harness
//!
//! colfs verifies that group-scoped collective file operations (create,
//! open, close, delete) and their negotiated access-policy flags behave
//! correctly when issued by disjoint, dynamically partitioned groups of
//! cooperating ranks, and that a structural mismatch surfaces as a
//! detectable hang instead of silent corruption.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use colfs::{run_named, CollectiveFileEngine, ScenarioConfig, POLICY_PROPAGATION};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = ScenarioConfig::new(dir.path().join("target.cfs"));
//! let report = run_named(
//!     POLICY_PROPAGATION,
//!     4,
//!     &config,
//!     Arc::new(CollectiveFileEngine::new()),
//! )
//! .unwrap();
//! assert!(report.passed(), "{}", report.diagnostics());
//! ```
//!
//! # Architecture
//!
//! - `colfs-core`: policy, configuration, report and error types
//! - `colfs-comm`: the in-process SPMD group runtime (split, free, barrier)
//! - `colfs-engine`: the storage-engine contract and the file-backed
//!   collective engine
//! - `colfs-harness`: the scenario orchestrators and the watchdog runner

// Re-export the public API
pub use colfs_comm::{ProcessGroup, World};
pub use colfs_core::{
    AccessPolicy, Error, GroupId, PolicyFlag, PolicyMismatch, Result, ScenarioConfig,
    ScenarioReport,
};
pub use colfs_engine::{CollectiveFileEngine, FileHandle, StorageEngine};
pub use colfs_harness::{
    lookup, names, policy_propagation, run_named, run_named_with_watchdog, run_scenario,
    run_scenario_with_watchdog, split_group_access, RankContext, ScenarioFn, WorldReport,
    DEFAULT_WATCHDOG, POLICY_PROPAGATION, SPLIT_GROUP_ACCESS,
};
