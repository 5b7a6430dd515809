//! Process groups and their collective primitives
//!
//! A [`ProcessGroup`] is one rank's handle onto a shared group core. The
//! core carries the group id, the member count, a generation-counted
//! barrier and a collective split table. Handles are created by
//! [`crate::World`] (the global group) or by [`ProcessGroup::split`]
//! (derived groups) and released with [`ProcessGroup::free`].
//!
//! Release is per-rank: a rank freeing its handle never disturbs peers
//! still using theirs. An asymmetric free leaks the shared core until the
//! last handle drops; it does not corrupt collective calls.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use colfs_core::{Error, GroupId, Result};
use parking_lot::{Condvar, Mutex};
use tracing::debug;

static NEXT_GROUP_ID: AtomicU64 = AtomicU64::new(1);

struct BarrierState {
    arrived: usize,
    generation: u64,
}

struct SplitState {
    /// Partition key submitted by each member rank this round
    keys: Vec<Option<i64>>,
    /// Child core + child rank awaiting pickup by each member rank
    children: Vec<Option<(Arc<GroupCore>, usize)>>,
    generation: u64,
}

/// Shared state of one process group, owned jointly by all member handles
pub(crate) struct GroupCore {
    id: GroupId,
    size: usize,
    barrier: Mutex<BarrierState>,
    barrier_cvar: Condvar,
    split: Mutex<SplitState>,
    split_cvar: Condvar,
}

impl GroupCore {
    pub(crate) fn alloc(size: usize) -> Arc<GroupCore> {
        let id = GroupId::new(NEXT_GROUP_ID.fetch_add(1, Ordering::Relaxed));
        Arc::new(GroupCore {
            id,
            size,
            barrier: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
            }),
            barrier_cvar: Condvar::new(),
            split: Mutex::new(SplitState {
                keys: vec![None; size],
                children: (0..size).map(|_| None).collect(),
                generation: 0,
            }),
            split_cvar: Condvar::new(),
        })
    }

    pub(crate) fn id(&self) -> GroupId {
        self.id
    }
}

/// One rank's handle onto a process group
///
/// Cloning shares the underlying group core (a file handle bound to the
/// group keeps it alive this way); the clone reports the same rank.
pub struct ProcessGroup {
    core: Arc<GroupCore>,
    rank: usize,
}

impl std::fmt::Debug for ProcessGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessGroup")
            .field("id", &self.core.id)
            .field("rank", &self.rank)
            .field("size", &self.core.size)
            .finish()
    }
}

impl Clone for ProcessGroup {
    fn clone(&self) -> Self {
        ProcessGroup {
            core: Arc::clone(&self.core),
            rank: self.rank,
        }
    }
}

impl ProcessGroup {
    pub(crate) fn from_parts(core: Arc<GroupCore>, rank: usize) -> Self {
        ProcessGroup { core, rank }
    }

    /// Group identity
    pub fn id(&self) -> GroupId {
        self.core.id
    }

    /// This handle's rank within the group
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of member ranks
    pub fn size(&self) -> usize {
        self.core.size
    }

    /// Block until every member of this group has called `barrier` on the
    /// same group, then release all of them together.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`] only on underlying runtime faults; the
    /// in-process runtime has none, but callers treat any failure here as
    /// fatal because a half-completed barrier leaves peers stuck.
    pub fn barrier(&self) -> Result<()> {
        let mut state = self.core.barrier.lock();
        let generation = state.generation;
        state.arrived += 1;
        if state.arrived == self.core.size {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.core.barrier_cvar.notify_all();
        } else {
            while state.generation == generation {
                self.core.barrier_cvar.wait(&mut state);
            }
        }
        Ok(())
    }

    /// Collectively partition this group by `key`.
    ///
    /// Every member submits an integer key; members sharing a key form one
    /// child group. Child ranks follow parent-rank order, so the lowest
    /// participating parent rank becomes rank 0 of its child group. Any
    /// integer is a valid key (N-way partitioning).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`] if the split table yields no child for
    /// this rank, which indicates a runtime defect rather than caller error.
    pub fn split(&self, key: i64) -> Result<ProcessGroup> {
        let mut state = self.core.split.lock();

        // A new round must not begin until this rank has collected its
        // child from the previous one.
        while state.children[self.rank].is_some() {
            self.core.split_cvar.wait(&mut state);
        }

        let generation = state.generation;
        state.keys[self.rank] = Some(key);

        if state.keys.iter().all(Option::is_some) {
            // Last arriver partitions: one child core per distinct key.
            let mut classes: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
            for (parent_rank, submitted) in state.keys.iter().enumerate() {
                let Some(k) = *submitted else {
                    return Err(Error::runtime("split table lost a key"));
                };
                classes.entry(k).or_default().push(parent_rank);
            }
            for members in classes.values() {
                let child = GroupCore::alloc(members.len());
                for (child_rank, parent_rank) in members.iter().enumerate() {
                    state.children[*parent_rank] = Some((Arc::clone(&child), child_rank));
                }
            }
            for slot in state.keys.iter_mut() {
                *slot = None;
            }
            state.generation = state.generation.wrapping_add(1);
            self.core.split_cvar.notify_all();
        } else {
            while state.generation == generation {
                self.core.split_cvar.wait(&mut state);
            }
        }

        let (child_core, child_rank) = state.children[self.rank]
            .take()
            .ok_or_else(|| Error::runtime("split produced no child group for this rank"))?;
        // Wake ranks waiting to start the next round.
        self.core.split_cvar.notify_all();

        debug!(
            target: "colfs::comm",
            parent = %self.core.id,
            child = %child_core.id,
            key,
            parent_rank = self.rank,
            child_rank,
            "group split"
        );
        Ok(ProcessGroup {
            core: child_core,
            rank: child_rank,
        })
    }

    /// Release this rank's handle on the group.
    ///
    /// Calling any group-scoped operation afterwards is impossible by
    /// construction (the handle is consumed). The shared core is dropped
    /// once every member and every bound file handle has released it.
    pub fn free(self) {
        debug!(target: "colfs::comm", group = %self.core.id, rank = self.rank, "group freed");
        drop(self);
    }
}
