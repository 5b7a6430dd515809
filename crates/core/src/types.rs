//! Opaque identifiers shared across layers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a process group.
///
/// Allocated by the group runtime when a group is created (the world group
/// or a split child). Identity matters: a collective call issued against a
/// group other than the one its peers used will never complete, so ids show
/// up in logs and diagnostics to make that traceable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(u64);

impl GroupId {
    /// Create a group id from its raw value
    pub fn new(raw: u64) -> Self {
        GroupId(raw)
    }

    /// Raw id value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group-{}", self.0)
    }
}
