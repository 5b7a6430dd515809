//! Access policy for group-scoped file containers
//!
//! An [`AccessPolicy`] is the pair of flags governing whether metadata
//! writes and metadata-reading API calls on a container must be issued
//! collectively by every member of the bound group. Both flags default to
//! false. The two flags are independent: setting one never touches the
//! other.
//!
//! A policy is built bound to a group, consumed at create/open, and can be
//! re-derived as a fresh instance from an open handle. The round-trip law
//! the harness verifies: deriving the policy from a handle opened with
//! policy `P` yields exactly `P`.

use crate::types::GroupId;
use serde::{Deserialize, Serialize};

/// Group-bound collective-metadata access policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    group: GroupId,
    collective_metadata_writes: bool,
    collective_metadata_reads_required: bool,
}

impl AccessPolicy {
    /// Create a default policy bound to `group` (both flags false)
    pub fn for_group(group: GroupId) -> Self {
        AccessPolicy {
            group,
            collective_metadata_writes: false,
            collective_metadata_reads_required: false,
        }
    }

    /// Group this policy is bound to
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Require (or stop requiring) metadata-mutating operations to be collective
    pub fn set_metadata_write_collective(&mut self, enabled: bool) {
        self.collective_metadata_writes = enabled;
    }

    /// Require (or stop requiring) metadata-reading API calls to be collective
    pub fn set_metadata_read_collective(&mut self, enabled: bool) {
        self.collective_metadata_reads_required = enabled;
    }

    /// Whether metadata-mutating operations must be collective
    pub fn metadata_write_collective(&self) -> bool {
        self.collective_metadata_writes
    }

    /// Whether metadata-reading API calls must be collective
    pub fn metadata_read_collective(&self) -> bool {
        self.collective_metadata_reads_required
    }

    /// Both flags as a `(writes, reads)` pair. Never fails.
    pub fn flags(&self) -> (bool, bool) {
        (
            self.collective_metadata_writes,
            self.collective_metadata_reads_required,
        )
    }

    /// Rebuild a policy from previously captured flags (e.g. a persisted
    /// container header), bound to `group`.
    pub fn from_flags(group: GroupId, writes: bool, reads: bool) -> Self {
        AccessPolicy {
            group,
            collective_metadata_writes: writes,
            collective_metadata_reads_required: reads,
        }
    }
}
