//! Policy propagation scenario
//!
//! Four stages over the same target file, all on the world group:
//!
//! 1. default-create: create with a default policy, both flags read false
//! 2. default-reopen: reopen with a default policy, both flags read false
//! 3. explicit-open: reopen with both flags set, both flags read true
//! 4. persisted-query: derive a fresh policy from the still-open handle of
//!    stage 3, both flags read true
//!
//! A wrong flag is recorded against its stage and never short-circuits the
//! scenario: every open handle is closed on every path, including the
//! failure path.

use colfs_core::{AccessPolicy, ScenarioConfig, ScenarioReport};
use colfs_engine::StorageEngine;
use tracing::info;

use crate::runner::RankContext;
use crate::scenario::POLICY_PROPAGATION;

const STAGE_DEFAULT_CREATE: &str = "default-create";
const STAGE_DEFAULT_REOPEN: &str = "default-reopen";
const STAGE_EXPLICIT_OPEN: &str = "explicit-open";
const STAGE_PERSISTED_QUERY: &str = "persisted-query";

/// Run the policy propagation scenario on this rank
pub fn policy_propagation(
    ctx: &RankContext,
    config: &ScenarioConfig,
    engine: &dyn StorageEngine,
) -> ScenarioReport {
    let mut report = ScenarioReport::new(POLICY_PROPAGATION, ctx.rank());
    let world = ctx.world();

    if config.verbose() {
        info!(
            target: "colfs::harness",
            path = %config.path().display(),
            rank = ctx.rank(),
            "policy propagation scenario on file"
        );
    }

    // Stage 1: create with everything unset.
    let default_policy = AccessPolicy::for_group(world.id());
    match engine.create(config.path(), world, &default_policy) {
        Ok(handle) => {
            report.check_flags(
                STAGE_DEFAULT_CREATE,
                (false, false),
                engine.policy(&handle).flags(),
            );
            if let Err(e) = engine.close(handle) {
                report.record_fatal(format!("{STAGE_DEFAULT_CREATE}: close failed: {e}"));
                return report;
            }
        }
        Err(e) => {
            report.record_fatal(format!("{STAGE_DEFAULT_CREATE}: create failed: {e}"));
            return report;
        }
    }

    // Stage 2: reopen, still unset.
    match engine.open(config.path(), world, &default_policy) {
        Ok(handle) => {
            report.check_flags(
                STAGE_DEFAULT_REOPEN,
                (false, false),
                engine.policy(&handle).flags(),
            );
            if let Err(e) = engine.close(handle) {
                report.record_fatal(format!("{STAGE_DEFAULT_REOPEN}: close failed: {e}"));
                return report;
            }
        }
        Err(e) => {
            report.record_fatal(format!("{STAGE_DEFAULT_REOPEN}: open failed: {e}"));
            return report;
        }
    }

    // Stage 3: reopen with both flags explicitly set. The handle stays
    // open so stage 4 can query the persisted policy from it.
    let mut explicit_policy = AccessPolicy::for_group(world.id());
    explicit_policy.set_metadata_write_collective(true);
    explicit_policy.set_metadata_read_collective(true);
    let handle = match engine.open(config.path(), world, &explicit_policy) {
        Ok(handle) => handle,
        Err(e) => {
            report.record_fatal(format!("{STAGE_EXPLICIT_OPEN}: open failed: {e}"));
            return report;
        }
    };
    report.check_flags(
        STAGE_EXPLICIT_OPEN,
        (true, true),
        engine.policy(&handle).flags(),
    );

    // Stage 4: derive a fresh policy from the open handle. From here on
    // the handle must be closed on every path, mismatch or fault.
    match engine.derive_policy(&handle) {
        Ok(derived) => {
            report.check_flags(STAGE_PERSISTED_QUERY, (true, true), derived.flags());
        }
        Err(e) => {
            report.record_fatal(format!("{STAGE_PERSISTED_QUERY}: derive failed: {e}"));
        }
    }
    if let Err(e) = engine.close(handle) {
        report.record_fatal(format!("{STAGE_PERSISTED_QUERY}: close failed: {e}"));
    }

    report
}
