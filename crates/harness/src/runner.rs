//! SPMD scenario runner with a wall-clock watchdog
//!
//! One OS thread per rank. Rank reports come back over a channel; if any
//! rank fails to report before the watchdog deadline the run is declared
//! hung and the blocked threads are abandoned rather than joined. A hang is
//! the expected failure signature for collective-call mismatches, so the
//! watchdog is the component that turns "never returns" into a report.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use colfs_comm::{ProcessGroup, World};
use colfs_core::{Result, ScenarioConfig, ScenarioReport};
use colfs_engine::StorageEngine;
use tracing::{info, warn};

/// Default watchdog deadline for a scenario run
pub const DEFAULT_WATCHDOG: Duration = Duration::from_secs(10);

/// Per-rank execution context handed to a scenario body
pub struct RankContext {
    world: ProcessGroup,
}

impl RankContext {
    /// World group handle for this rank
    pub fn world(&self) -> &ProcessGroup {
        &self.world
    }

    /// This rank's position in the world group
    pub fn rank(&self) -> usize {
        self.world.rank()
    }

    /// World size
    pub fn size(&self) -> usize {
        self.world.size()
    }
}

/// Merged outcome of one scenario run across all ranks
#[derive(Debug)]
pub struct WorldReport {
    scenario: String,
    reports: Vec<Option<ScenarioReport>>,
    hung_ranks: Vec<usize>,
}

impl WorldReport {
    /// Scenario name
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Whether every rank reported back and passed
    pub fn passed(&self) -> bool {
        self.hung_ranks.is_empty()
            && self
                .reports
                .iter()
                .all(|r| r.as_ref().is_some_and(ScenarioReport::passed))
    }

    /// Ranks that missed the watchdog deadline
    pub fn hung_ranks(&self) -> &[usize] {
        &self.hung_ranks
    }

    /// Report from `rank`, if it returned in time
    pub fn rank_report(&self, rank: usize) -> Option<&ScenarioReport> {
        self.reports.get(rank).and_then(Option::as_ref)
    }

    /// All reports that arrived, in rank order
    pub fn rank_reports(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.reports.iter().filter_map(Option::as_ref)
    }

    /// Human-readable diagnostic string (empty when passing)
    pub fn diagnostics(&self) -> String {
        let mut lines = Vec::new();
        if !self.hung_ranks.is_empty() {
            lines.push(format!(
                "{}: ranks {:?} did not return before the watchdog deadline",
                self.scenario, self.hung_ranks
            ));
        }
        for report in self.rank_reports() {
            let text = report.diagnostics();
            if !text.is_empty() {
                lines.push(text);
            }
        }
        lines.join("\n")
    }
}

/// Run `body` as an SPMD scenario across `size` ranks with the default
/// watchdog deadline.
///
/// # Errors
///
/// Returns an error if the world cannot be built or a rank thread cannot
/// be spawned. Scenario-level failures are reported in the [`WorldReport`],
/// never as an `Err`.
pub fn run_scenario<F>(
    name: &str,
    size: usize,
    config: &ScenarioConfig,
    engine: Arc<dyn StorageEngine>,
    body: F,
) -> Result<WorldReport>
where
    F: Fn(&RankContext, &ScenarioConfig, &dyn StorageEngine) -> ScenarioReport
        + Send
        + Sync
        + 'static,
{
    run_scenario_with_watchdog(name, size, config, engine, DEFAULT_WATCHDOG, body)
}

/// Run `body` as an SPMD scenario with an explicit watchdog deadline.
///
/// # Errors
///
/// Returns an error if the world cannot be built or a rank thread cannot
/// be spawned.
pub fn run_scenario_with_watchdog<F>(
    name: &str,
    size: usize,
    config: &ScenarioConfig,
    engine: Arc<dyn StorageEngine>,
    watchdog: Duration,
    body: F,
) -> Result<WorldReport>
where
    F: Fn(&RankContext, &ScenarioConfig, &dyn StorageEngine) -> ScenarioReport
        + Send
        + Sync
        + 'static,
{
    let world = World::new(size)?;
    let body = Arc::new(body);
    let (tx, rx) = mpsc::channel();

    info!(
        target: "colfs::harness",
        scenario = name,
        size,
        path = %config.path().display(),
        "scenario starting"
    );

    let mut join_handles = Vec::with_capacity(size);
    for group in world.handles() {
        let rank = group.rank();
        let tx = tx.clone();
        let config = config.clone();
        let engine = Arc::clone(&engine);
        let body = Arc::clone(&body);
        let handle = thread::Builder::new()
            .name(format!("rank-{rank}"))
            .spawn(move || {
                let ctx = RankContext { world: group };
                let report = body(&ctx, &config, engine.as_ref());
                // The receiver may have given up on a hung run already.
                let _ = tx.send((rank, report));
            })?;
        join_handles.push(handle);
    }
    drop(tx);

    let deadline = Instant::now() + watchdog;
    let mut reports: Vec<Option<ScenarioReport>> = (0..size).map(|_| None).collect();
    let mut received = 0;
    while received < size {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((rank, report)) => {
                reports[rank] = Some(report);
                received += 1;
            }
            Err(_) => break,
        }
    }

    let hung_ranks: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter_map(|(rank, r)| r.is_none().then_some(rank))
        .collect();

    if hung_ranks.is_empty() {
        for handle in join_handles {
            if handle.join().is_err() {
                warn!(target: "colfs::harness", scenario = name, "rank thread panicked after reporting");
            }
        }
    } else {
        // Blocked threads hold collective locks forever; abandon them.
        warn!(
            target: "colfs::harness",
            scenario = name,
            hung = ?hung_ranks,
            "watchdog expired, abandoning blocked rank threads"
        );
    }

    Ok(WorldReport {
        scenario: name.to_string(),
        reports,
        hung_ranks,
    })
}
