//! Split-group collective access scenario
//!
//! The world group is partitioned by rank parity. Even ranks (the acting
//! sub-group) run a full collective create/close cycle on their own group
//! handle and child-rank 0 deletes the target afterwards; odd ranks (the
//! passive sub-group) only barrier on theirs. Both sub-groups free their
//! handles and the whole world re-synchronizes.
//!
//! If any collective file operation synchronized on the wrong group, some
//! rank would eventually block on a barrier its peers never reach. The
//! pass criterion is therefore simply that every rank returns; the runner's
//! watchdog converts the hang into a failure.

use colfs_core::{AccessPolicy, ScenarioConfig, ScenarioReport};
use colfs_engine::StorageEngine;
use tracing::{info, warn};

use crate::runner::RankContext;
use crate::scenario::SPLIT_GROUP_ACCESS;

const ACTING_KEY: i64 = 0;

/// Run the split-group access scenario on this rank
pub fn split_group_access(
    ctx: &RankContext,
    config: &ScenarioConfig,
    engine: &dyn StorageEngine,
) -> ScenarioReport {
    let mut report = ScenarioReport::new(SPLIT_GROUP_ACCESS, ctx.rank());
    let world = ctx.world();

    if config.verbose() {
        info!(
            target: "colfs::harness",
            path = %config.path().display(),
            rank = ctx.rank(),
            "split group access scenario on file"
        );
    }

    let key = (world.rank() % 2) as i64;
    let child = match world.split(key) {
        Ok(child) => child,
        Err(e) => {
            report.record_fatal(format!("world split failed: {e}"));
            return report;
        }
    };

    if key == ACTING_KEY {
        // Acting sub-group: full collective lifecycle on the child handle.
        let policy = AccessPolicy::for_group(child.id());
        match engine.create(config.path(), &child, &policy) {
            Ok(handle) => {
                let sub_rank = child.rank();
                if let Err(e) = engine.close(handle) {
                    report.record_fatal(format!("close failed: {e}"));
                }
                // Best-effort cleanup by one member only; failure here is
                // tolerated so concurrent runs cannot turn a delete race
                // into a scenario failure.
                if sub_rank == 0 {
                    if let Err(e) = engine.delete(config.path()) {
                        warn!(
                            target: "colfs::harness",
                            path = %config.path().display(),
                            error = %e,
                            "best-effort delete failed"
                        );
                    }
                }
            }
            Err(e) => {
                report.record_fatal(format!("create failed: {e}"));
            }
        }
    } else {
        // Passive sub-group: synchronize once on its own handle.
        if let Err(e) = child.barrier() {
            report.record_fatal(format!("passive barrier failed: {e}"));
        }
    }

    child.free();
    if let Err(e) = world.barrier() {
        report.record_fatal(format!("final world barrier failed: {e}"));
    }
    report
}
