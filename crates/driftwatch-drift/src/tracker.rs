//! Configuration version tracking.

use crate::normalize::normalize_config;
use chrono::Utc;
use driftwatch_common::{ConfigStore, PollResult};
use std::sync::Arc;
use tracing::{debug, info};

/// How many archived versions a device retains after trimming.
pub const DEFAULT_ARCHIVE_KEEP: usize = 10;

/// Captures device configurations and versions them through a [`ConfigStore`].
///
/// The tracker stores raw capture text verbatim; normalization is applied
/// only when deciding whether two captures are the same configuration, so a
/// vendor timestamp banner never produces a new version.
pub struct ConfigTracker {
    store: Arc<dyn ConfigStore>,
}

impl ConfigTracker {
    /// Creates a tracker over the given store.
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Records a freshly captured configuration for a device.
    ///
    /// Returns `true` when the capture became a new current version (first
    /// capture, or the configuration materially changed) and `false` when it
    /// normalized equal to the current version and nothing was written.
    pub async fn capture(&self, unique_id: &str, raw: &str) -> PollResult<bool> {
        let current = self.store.get_current(unique_id).await?;

        if let Some(current) = current {
            if normalize_config(&current.configuration) == normalize_config(raw) {
                debug!(unique_id, "configuration unchanged");
                return Ok(false);
            }
            info!(unique_id, "configuration changed, archiving previous version");
        } else {
            info!(unique_id, "first configuration capture");
        }

        self.store
            .archive_and_replace(unique_id, raw, Utc::now())
            .await?;
        Ok(true)
    }

    /// Deletes archived versions beyond the `keep` most recent.
    pub async fn trim_archive(&self, unique_id: &str, keep: usize) -> PollResult<usize> {
        let deleted = self.store.prune_archive(unique_id, keep).await?;
        if deleted > 0 {
            debug!(unique_id, deleted, "trimmed configuration archive");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use driftwatch_types::ConfigVersion;
    use std::sync::Mutex;

    /// In-memory store that counts writes so tests can assert idempotence.
    #[derive(Default)]
    struct FakeConfigStore {
        current: Mutex<Option<ConfigVersion>>,
        archive: Mutex<Vec<ConfigVersion>>,
        writes: Mutex<usize>,
    }

    impl FakeConfigStore {
        fn write_count(&self) -> usize {
            *self.writes.lock().unwrap()
        }
    }

    #[async_trait]
    impl ConfigStore for FakeConfigStore {
        async fn get_current(&self, _unique_id: &str) -> PollResult<Option<ConfigVersion>> {
            Ok(self.current.lock().unwrap().clone())
        }

        async fn archive_and_replace(
            &self,
            unique_id: &str,
            configuration: &str,
            captured_at: DateTime<Utc>,
        ) -> PollResult<()> {
            let mut current = self.current.lock().unwrap();
            if let Some(previous) = current.take() {
                self.archive.lock().unwrap().insert(0, previous);
            }
            *current = Some(ConfigVersion::new(unique_id, configuration, captured_at));
            *self.writes.lock().unwrap() += 1;
            Ok(())
        }

        async fn get_archive_history(&self, _unique_id: &str) -> PollResult<Vec<ConfigVersion>> {
            Ok(self.archive.lock().unwrap().clone())
        }

        async fn prune_archive(&self, _unique_id: &str, keep: usize) -> PollResult<usize> {
            let mut archive = self.archive.lock().unwrap();
            let deleted = archive.len().saturating_sub(keep);
            archive.truncate(keep);
            Ok(deleted)
        }
    }

    #[tokio::test]
    async fn test_first_capture_becomes_current() {
        let store = Arc::new(FakeConfigStore::default());
        let tracker = ConfigTracker::new(store.clone());

        let changed = tracker
            .capture("aabb.cc00.0100", "hostname edge-1\n")
            .await
            .unwrap();
        assert!(changed);
        assert_eq!(store.write_count(), 1);
        assert!(store.archive.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_capture_writes_nothing() {
        let store = Arc::new(FakeConfigStore::default());
        let tracker = ConfigTracker::new(store.clone());

        tracker
            .capture("aabb.cc00.0100", "hostname edge-1\n")
            .await
            .unwrap();
        let changed = tracker
            .capture("aabb.cc00.0100", "hostname edge-1\n")
            .await
            .unwrap();

        assert!(!changed);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_banner_only_difference_is_not_a_change() {
        let store = Arc::new(FakeConfigStore::default());
        let tracker = ConfigTracker::new(store.clone());

        let first = "Building configuration...\n! Last configuration change at 09:00 Mon Jan 5\nhostname edge-1\n";
        let second = "Building configuration...\n! Last configuration change at 17:30 Wed Feb 18\nhostname edge-1\n";

        tracker.capture("aabb.cc00.0100", first).await.unwrap();
        let changed = tracker.capture("aabb.cc00.0100", second).await.unwrap();

        assert!(!changed);
        assert_eq!(store.write_count(), 1);
        // The stored text stays raw, banner included.
        let current = store.current.lock().unwrap().clone().unwrap();
        assert!(current.configuration.contains("Building configuration"));
    }

    #[tokio::test]
    async fn test_changed_capture_archives_previous() {
        let store = Arc::new(FakeConfigStore::default());
        let tracker = ConfigTracker::new(store.clone());

        tracker
            .capture("aabb.cc00.0100", "hostname edge-1\n")
            .await
            .unwrap();
        let changed = tracker
            .capture("aabb.cc00.0100", "hostname edge-1\nrouter ospf 10\n")
            .await
            .unwrap();

        assert!(changed);
        assert_eq!(store.write_count(), 2);
        let archive = store.archive.lock().unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].configuration, "hostname edge-1\n");
    }

    #[tokio::test]
    async fn test_trim_archive_keeps_most_recent() {
        let store = Arc::new(FakeConfigStore::default());
        let tracker = ConfigTracker::new(store.clone());

        for n in 0..15 {
            tracker
                .capture("aabb.cc00.0100", &format!("hostname edge-{n}\n"))
                .await
                .unwrap();
        }

        let deleted = tracker
            .trim_archive("aabb.cc00.0100", DEFAULT_ARCHIVE_KEEP)
            .await
            .unwrap();
        assert_eq!(deleted, 4);
        assert_eq!(store.archive.lock().unwrap().len(), DEFAULT_ARCHIVE_KEEP);
    }
}
