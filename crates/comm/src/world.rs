//! The well-known global group of an SPMD run

use std::sync::Arc;

use colfs_core::{Error, GroupId, Result};
use tracing::debug;

use crate::group::{GroupCore, ProcessGroup};

/// Builder for the global process group of a run with a fixed rank count.
///
/// `World::new(n)` allocates the shared group core; [`World::handles`]
/// hands out one [`ProcessGroup`] per rank, in rank order, for the caller
/// to distribute across its rank threads.
pub struct World {
    core: Arc<GroupCore>,
    size: usize,
}

impl World {
    /// Create the world group for `size` ranks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] for a zero-rank world.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidOperation(
                "world requires at least one rank".to_string(),
            ));
        }
        let core = GroupCore::alloc(size);
        debug!(target: "colfs::comm", size, "world group created");
        Ok(World { core, size })
    }

    /// Number of ranks in this world
    pub fn size(&self) -> usize {
        self.size
    }

    /// Identity of the world group
    pub fn id(&self) -> GroupId {
        self.core.id()
    }

    /// One handle per rank, in rank order
    pub fn handles(&self) -> Vec<ProcessGroup> {
        (0..self.size)
            .map(|rank| ProcessGroup::from_parts(Arc::clone(&self.core), rank))
            .collect()
    }
}
