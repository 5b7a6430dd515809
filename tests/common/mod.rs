//! Shared test utilities for the scenario integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's
//! main.rs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use colfs::{
    AccessPolicy, CollectiveFileEngine, Error, FileHandle, ProcessGroup, Result, ScenarioConfig,
    StorageEngine,
};
use tempfile::TempDir;

/// Install a subscriber so `COLFS_TEST_LOG=1 cargo test -- --nocapture`
/// shows the harness's tracing output. Safe to call from every test.
pub fn init_tracing() {
    if std::env::var_os("COLFS_TEST_LOG").is_some() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }
}

/// Scratch directory plus a scenario config pointing into it.
pub struct TestArea {
    pub dir: TempDir,
    pub config: ScenarioConfig,
}

impl TestArea {
    pub fn new(file_name: &str) -> Self {
        let dir = TempDir::new().expect("create scratch dir");
        let config = ScenarioConfig::new(dir.path().join(file_name));
        TestArea { dir, config }
    }

    pub fn target(&self) -> &Path {
        self.config.path()
    }
}

/// Engine wrapper that counts calls while delegating to the real
/// collective engine. Used to prove which ranks touched the target.
pub struct SpyEngine {
    inner: CollectiveFileEngine,
    pub creates: AtomicUsize,
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl SpyEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(SpyEngine {
            inner: CollectiveFileEngine::new(),
            creates: AtomicUsize::new(0),
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        })
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

impl StorageEngine for SpyEngine {
    fn create(
        &self,
        path: &Path,
        group: &ProcessGroup,
        policy: &AccessPolicy,
    ) -> Result<FileHandle> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(path, group, policy)
    }

    fn open(
        &self,
        path: &Path,
        group: &ProcessGroup,
        policy: &AccessPolicy,
    ) -> Result<FileHandle> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.inner.open(path, group, policy)
    }

    fn close(&self, handle: FileHandle) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close(handle)
    }

    fn policy(&self, handle: &FileHandle) -> AccessPolicy {
        self.inner.policy(handle)
    }

    fn derive_policy(&self, handle: &FileHandle) -> Result<AccessPolicy> {
        self.inner.derive_policy(handle)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(path)
    }
}

/// Engine whose create/open always fail. Lets the suites check that an
/// engine fault aborts a scenario without wedging the other ranks.
pub struct BrokenEngine;

impl StorageEngine for BrokenEngine {
    fn create(&self, _: &Path, _: &ProcessGroup, _: &AccessPolicy) -> Result<FileHandle> {
        Err(Error::engine("create", "injected fault"))
    }

    fn open(&self, _: &Path, _: &ProcessGroup, _: &AccessPolicy) -> Result<FileHandle> {
        Err(Error::engine("open", "injected fault"))
    }

    fn close(&self, _: FileHandle) -> Result<()> {
        Ok(())
    }

    fn policy(&self, handle: &FileHandle) -> AccessPolicy {
        *handle.policy()
    }

    fn derive_policy(&self, handle: &FileHandle) -> Result<AccessPolicy> {
        Ok(*handle.policy())
    }

    fn delete(&self, _: &Path) -> Result<()> {
        Ok(())
    }
}

/// Engine that delegates I/O but always reports default policy flags,
/// simulating an engine that drops negotiated settings. Used to check that
/// mismatches are labeled and that cleanup still runs.
pub struct AmnesicEngine {
    inner: CollectiveFileEngine,
    pub closes: AtomicUsize,
}

impl AmnesicEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(AmnesicEngine {
            inner: CollectiveFileEngine::new(),
            closes: AtomicUsize::new(0),
        })
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl StorageEngine for AmnesicEngine {
    fn create(
        &self,
        path: &Path,
        group: &ProcessGroup,
        policy: &AccessPolicy,
    ) -> Result<FileHandle> {
        self.inner.create(path, group, policy)
    }

    fn open(
        &self,
        path: &Path,
        group: &ProcessGroup,
        policy: &AccessPolicy,
    ) -> Result<FileHandle> {
        self.inner.open(path, group, policy)
    }

    fn close(&self, handle: FileHandle) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close(handle)
    }

    fn policy(&self, handle: &FileHandle) -> AccessPolicy {
        // Negotiated flags forgotten.
        AccessPolicy::for_group(handle.group().id())
    }

    fn derive_policy(&self, handle: &FileHandle) -> Result<AccessPolicy> {
        Ok(AccessPolicy::for_group(handle.group().id()))
    }

    fn delete(&self, path: &Path) -> Result<()> {
        self.inner.delete(path)
    }
}

/// Watchdog deadline short enough for hang tests, long enough for real
/// scenario work on a loaded CI machine.
pub fn short_watchdog() -> std::time::Duration {
    std::time::Duration::from_millis(500)
}
