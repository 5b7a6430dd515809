//! File-backed collective engine
//!
//! Every operation is collective over the handle's bound group: the call
//! rendezvouses the group's members, rank 0 performs the actual filesystem
//! work, and a second rendezvous publishes the result before any member
//! proceeds. A caller that passes the wrong group handle therefore blocks
//! exactly the way a mismatched barrier does, which is the failure
//! signature the harness scenarios look for.

use std::fs;
use std::io::Read;
use std::path::Path;

use colfs_comm::ProcessGroup;
use colfs_core::{AccessPolicy, Error, Result};
use tracing::debug;

use crate::format::{ContainerHeader, CONTAINER_HEADER_SIZE};
use crate::traits::{FileHandle, StorageEngine};

/// Stateless engine over plain files with a colfs container header
#[derive(Debug, Default)]
pub struct CollectiveFileEngine;

impl CollectiveFileEngine {
    /// Create a new engine
    pub fn new() -> Self {
        CollectiveFileEngine
    }
}

fn read_header(path: &Path) -> Result<ContainerHeader> {
    let mut file = fs::File::open(path)?;
    let mut bytes = [0u8; CONTAINER_HEADER_SIZE];
    file.read_exact(&mut bytes)?;
    ContainerHeader::from_bytes(&bytes)
}

impl StorageEngine for CollectiveFileEngine {
    fn create(
        &self,
        path: &Path,
        group: &ProcessGroup,
        policy: &AccessPolicy,
    ) -> Result<FileHandle> {
        group.barrier()?;
        let io_result = if group.rank() == 0 {
            fs::write(path, ContainerHeader::from_policy(policy).to_bytes())
        } else {
            Ok(())
        };
        // Publish rank 0's header before any member proceeds, whether or
        // not the write succeeded, so the group stays in lockstep.
        group.barrier()?;
        io_result.map_err(|e| Error::engine("create", e.to_string()))?;
        if group.rank() != 0 {
            read_header(path).map_err(|e| Error::engine("create", e.to_string()))?;
        }
        debug!(
            target: "colfs::engine",
            path = %path.display(),
            group = %group.id(),
            rank = group.rank(),
            "container created"
        );
        Ok(FileHandle::new(path, group.clone(), *policy))
    }

    fn open(
        &self,
        path: &Path,
        group: &ProcessGroup,
        policy: &AccessPolicy,
    ) -> Result<FileHandle> {
        group.barrier()?;
        let negotiate_result = if group.rank() == 0 {
            // Validate the existing container, then renegotiate its flags
            // to this open's policy.
            read_header(path).and_then(|_| {
                fs::write(path, ContainerHeader::from_policy(policy).to_bytes())
                    .map_err(Error::from)
            })
        } else {
            Ok(())
        };
        group.barrier()?;
        negotiate_result.map_err(|e| Error::engine("open", e.to_string()))?;
        if group.rank() != 0 {
            let header = read_header(path).map_err(|e| Error::engine("open", e.to_string()))?;
            if header.flags() != policy.flags() {
                return Err(Error::engine(
                    "open",
                    format!(
                        "negotiated flags {:?} do not match requested {:?}",
                        header.flags(),
                        policy.flags()
                    ),
                ));
            }
        }
        debug!(
            target: "colfs::engine",
            path = %path.display(),
            group = %group.id(),
            rank = group.rank(),
            "container opened"
        );
        Ok(FileHandle::new(path, group.clone(), *policy))
    }

    fn close(&self, handle: FileHandle) -> Result<()> {
        handle.group().barrier()?;
        debug!(
            target: "colfs::engine",
            path = %handle.path().display(),
            group = %handle.group().id(),
            rank = handle.group().rank(),
            "container closed"
        );
        drop(handle);
        Ok(())
    }

    fn policy(&self, handle: &FileHandle) -> AccessPolicy {
        *handle.policy()
    }

    fn derive_policy(&self, handle: &FileHandle) -> Result<AccessPolicy> {
        let header =
            read_header(handle.path()).map_err(|e| Error::engine("derive_policy", e.to_string()))?;
        Ok(header.to_policy(handle.group().id()))
    }

    fn delete(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)?;
        debug!(target: "colfs::engine", path = %path.display(), "container deleted");
        Ok(())
    }
}
