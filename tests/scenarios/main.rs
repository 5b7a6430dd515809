//! Scenario integration tests
//!
//! End-to-end runs of the registered scenarios across multi-rank worlds,
//! plus the hang-detection and cleanup-discipline properties.

#[path = "../common/mod.rs"]
mod common;

mod policy_propagation;
