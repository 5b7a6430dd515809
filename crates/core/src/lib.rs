//! Core types for the colfs consistency harness
//!
//! This crate defines the foundational types used throughout the system:
//! - GroupId: Opaque identifier for process groups
//! - AccessPolicy: Group-bound collective-metadata flags
//! - ScenarioConfig: Per-scenario configuration threaded through orchestrators
//! - ScenarioReport: Labeled pass/fail outcome with policy-mismatch records
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod policy;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::ScenarioConfig;
pub use error::{Error, Result};
pub use policy::AccessPolicy;
pub use report::{PolicyFlag, PolicyMismatch, ScenarioReport};
pub use types::GroupId;
