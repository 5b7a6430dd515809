//! Scenario outcome reporting
//!
//! Scenarios never panic on a wrong flag value. Each check is recorded
//! against its stage name so the scenario can keep going to its teardown
//! phase and release every handle before the overall failure is reported.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two access-policy flags a check refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyFlag {
    /// `collective_metadata_writes`
    MetadataWrites,
    /// `collective_metadata_reads_required`
    MetadataReads,
}

impl fmt::Display for PolicyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyFlag::MetadataWrites => "collective metadata writes",
            PolicyFlag::MetadataReads => "collective metadata reads",
        };
        f.write_str(name)
    }
}

/// A single failed flag check, labeled with the stage it occurred in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyMismatch {
    /// Stage name (e.g. "default-create", "persisted-query")
    pub stage: String,
    /// Flag that read back wrong
    pub flag: PolicyFlag,
    /// Expected flag value
    pub expected: bool,
    /// Actual flag value
    pub actual: bool,
}

impl fmt::Display for PolicyMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: expected {}, got {}",
            self.stage, self.flag, self.expected, self.actual
        )
    }
}

/// Per-rank outcome of one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    scenario: String,
    rank: usize,
    mismatches: Vec<PolicyMismatch>,
    fatal: Option<String>,
}

impl ScenarioReport {
    /// Create an empty (passing) report for `scenario` as seen by `rank`
    pub fn new(scenario: impl Into<String>, rank: usize) -> Self {
        ScenarioReport {
            scenario: scenario.into(),
            rank,
            mismatches: Vec::new(),
            fatal: None,
        }
    }

    /// Scenario name this report belongs to
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// World rank that produced this report
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Compare a `(writes, reads)` pair against the expectation for `stage`,
    /// recording one mismatch per flag that differs.
    pub fn check_flags(&mut self, stage: &str, expected: (bool, bool), actual: (bool, bool)) {
        if expected.0 != actual.0 {
            self.mismatches.push(PolicyMismatch {
                stage: stage.to_string(),
                flag: PolicyFlag::MetadataWrites,
                expected: expected.0,
                actual: actual.0,
            });
        }
        if expected.1 != actual.1 {
            self.mismatches.push(PolicyMismatch {
                stage: stage.to_string(),
                flag: PolicyFlag::MetadataReads,
                expected: expected.1,
                actual: actual.1,
            });
        }
    }

    /// Record a fatal fault (runtime or engine). The first fatal wins; later
    /// ones are appended to the diagnostic text.
    pub fn record_fatal(&mut self, detail: impl Into<String>) {
        match &mut self.fatal {
            None => self.fatal = Some(detail.into()),
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(&detail.into());
            }
        }
    }

    /// Whether the scenario passed on this rank
    pub fn passed(&self) -> bool {
        self.fatal.is_none() && self.mismatches.is_empty()
    }

    /// Recorded mismatches, in check order
    pub fn mismatches(&self) -> &[PolicyMismatch] {
        &self.mismatches
    }

    /// Fatal fault diagnostic, if any
    pub fn fatal(&self) -> Option<&str> {
        self.fatal.as_deref()
    }

    /// Human-readable diagnostic string (empty when passing)
    pub fn diagnostics(&self) -> String {
        let mut lines = Vec::new();
        if let Some(fatal) = &self.fatal {
            lines.push(format!(
                "{} rank {}: fatal: {}",
                self.scenario, self.rank, fatal
            ));
        }
        for m in &self.mismatches {
            lines.push(format!("{} rank {}: {}", self.scenario, self.rank, m));
        }
        lines.join("\n")
    }
}
