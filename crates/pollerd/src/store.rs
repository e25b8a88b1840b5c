//! In-memory store implementations.
//!
//! Back the daemon until a persistence engine is wired in, and give tests a
//! store whose internals they can inspect. Archives live alongside currents
//! in the same process; nothing survives a restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use driftwatch_common::{
    ConfigStore, CredentialStore, PollError, PollResult, SnapshotStore, WatchWordStore,
};
use driftwatch_types::{
    ConfigVersion, DeviceCredential, DeviceSnapshot, DeviceStatus, WatchWord,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Snapshot store holding currents and an append-only archive in memory.
#[derive(Default)]
pub struct MemorySnapshotStore {
    current: RwLock<HashMap<String, DeviceSnapshot>>,
    archive: RwLock<Vec<DeviceSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of archived snapshots (for tests and diagnostics).
    pub async fn archived_count(&self) -> usize {
        self.archive.read().await.len()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn get_current(&self, unique_id: &str) -> PollResult<Option<DeviceSnapshot>> {
        Ok(self.current.read().await.get(unique_id).cloned())
    }

    async fn list_current(&self) -> PollResult<Vec<DeviceSnapshot>> {
        Ok(self.current.read().await.values().cloned().collect())
    }

    async fn archive_and_replace(&self, snapshot: DeviceSnapshot) -> PollResult<()> {
        let mut current = self.current.write().await;
        if let Some(previous) = current.insert(snapshot.unique_id.clone(), snapshot) {
            self.archive.write().await.push(previous);
        }
        Ok(())
    }

    async fn update_throughput(
        &self,
        unique_id: &str,
        interface: &str,
        mbps_in: f64,
        mbps_out: f64,
    ) -> PollResult<()> {
        let mut current = self.current.write().await;
        let snapshot = current.get_mut(unique_id).ok_or_else(|| {
            PollError::store("update_throughput", format!("no snapshot for {unique_id}"))
        })?;
        let record = snapshot
            .interfaces
            .iter_mut()
            .find(|i| i.name == interface)
            .ok_or_else(|| {
                PollError::store(
                    "update_throughput",
                    format!("no interface {interface} on {unique_id}"),
                )
            })?;
        record.mbps_in = Some(mbps_in);
        record.mbps_out = Some(mbps_out);
        Ok(())
    }

    async fn mark_inactive(&self, unique_id: &str) -> PollResult<()> {
        if let Some(snapshot) = self.current.write().await.get_mut(unique_id) {
            snapshot.status = DeviceStatus::Inactive;
        }
        Ok(())
    }
}

/// Configuration store holding one current version and a newest-first
/// archive per device.
#[derive(Default)]
pub struct MemoryConfigStore {
    current: RwLock<HashMap<String, ConfigVersion>>,
    archive: RwLock<HashMap<String, Vec<ConfigVersion>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get_current(&self, unique_id: &str) -> PollResult<Option<ConfigVersion>> {
        Ok(self.current.read().await.get(unique_id).cloned())
    }

    async fn archive_and_replace(
        &self,
        unique_id: &str,
        configuration: &str,
        captured_at: DateTime<Utc>,
    ) -> PollResult<()> {
        let mut current = self.current.write().await;
        let new_version = ConfigVersion::new(unique_id, configuration, captured_at);
        if let Some(previous) = current.insert(unique_id.to_string(), new_version) {
            self.archive
                .write()
                .await
                .entry(unique_id.to_string())
                .or_default()
                .insert(0, previous);
        }
        Ok(())
    }

    async fn get_archive_history(&self, unique_id: &str) -> PollResult<Vec<ConfigVersion>> {
        Ok(self
            .archive
            .read()
            .await
            .get(unique_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn prune_archive(&self, unique_id: &str, keep: usize) -> PollResult<usize> {
        let mut archive = self.archive.write().await;
        let Some(versions) = archive.get_mut(unique_id) else {
            return Ok(0);
        };
        let deleted = versions.len().saturating_sub(keep);
        versions.truncate(keep);
        Ok(deleted)
    }
}

/// Credential store over an operator-provided list.
pub struct MemoryCredentialStore {
    credentials: Vec<DeviceCredential>,
}

impl MemoryCredentialStore {
    pub fn new(credentials: Vec<DeviceCredential>) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn list_all(&self) -> PollResult<Vec<DeviceCredential>> {
        Ok(self.credentials.clone())
    }

    async fn get_by_address(&self, address: &str) -> PollResult<Option<DeviceCredential>> {
        Ok(self
            .credentials
            .iter()
            .find(|c| c.address == address)
            .cloned())
    }
}

/// Watchword store over a fixed list.
#[derive(Default)]
pub struct MemoryWatchWordStore {
    watchwords: Vec<WatchWord>,
}

impl MemoryWatchWordStore {
    pub fn new(watchwords: Vec<WatchWord>) -> Self {
        Self { watchwords }
    }
}

#[async_trait]
impl WatchWordStore for MemoryWatchWordStore {
    async fn list_all(&self) -> PollResult<Vec<WatchWord>> {
        Ok(self.watchwords.clone())
    }
}
