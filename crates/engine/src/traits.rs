//! Storage engine contract
//!
//! The harness never talks to a concrete engine type: scenarios take
//! `&dyn StorageEngine`, which is the seam the integration tests use to
//! substitute spying or failing engines.

use std::path::{Path, PathBuf};

use colfs_comm::ProcessGroup;
use colfs_core::{AccessPolicy, Result};

/// Handle to an open container, bound to exactly one process group.
///
/// Every engine operation on the handle is collective over the bound
/// group. The handle is consumed by [`StorageEngine::close`]; use after
/// close is impossible by construction.
#[derive(Debug)]
pub struct FileHandle {
    path: PathBuf,
    group: ProcessGroup,
    policy: AccessPolicy,
}

impl FileHandle {
    /// Build a handle for `path`, bound to `group`, negotiated with `policy`
    pub fn new(path: impl Into<PathBuf>, group: ProcessGroup, policy: AccessPolicy) -> Self {
        FileHandle {
            path: path.into(),
            group,
            policy,
        }
    }

    /// Container path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Group this handle is bound to
    pub fn group(&self) -> &ProcessGroup {
        &self.group
    }

    /// Policy negotiated when the handle was opened
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }
}

/// The storage-engine collaborator surface exercised by the scenarios
pub trait StorageEngine: Send + Sync {
    /// Collectively create (truncating) the container at `path` on behalf
    /// of every member of `group`, negotiating `policy`.
    ///
    /// # Errors
    ///
    /// Returns an engine fault if the container cannot be written; the
    /// harness treats this as fatal.
    fn create(&self, path: &Path, group: &ProcessGroup, policy: &AccessPolicy)
        -> Result<FileHandle>;

    /// Collectively open an existing container, renegotiating `policy`.
    ///
    /// # Errors
    ///
    /// Returns an engine fault if the container is missing or its header
    /// fails validation.
    fn open(&self, path: &Path, group: &ProcessGroup, policy: &AccessPolicy)
        -> Result<FileHandle>;

    /// Collectively close the handle, consuming it.
    ///
    /// # Errors
    ///
    /// Returns an engine fault on underlying runtime failure.
    fn close(&self, handle: FileHandle) -> Result<()>;

    /// Policy as negotiated on the open handle. Never fails for a valid
    /// handle; this echoes handle state without touching the file.
    fn policy(&self, handle: &FileHandle) -> AccessPolicy;

    /// Derive a fresh policy from the persisted container the handle is
    /// open on. Unlike [`StorageEngine::policy`] this re-reads the file,
    /// proving the flags were negotiated at the file level.
    ///
    /// # Errors
    ///
    /// Returns an engine fault if the header cannot be read back.
    fn derive_policy(&self, handle: &FileHandle) -> Result<AccessPolicy>;

    /// Best-effort single-process delete of the container at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; callers log and tolerate it.
    fn delete(&self, path: &Path) -> Result<()>;
}
