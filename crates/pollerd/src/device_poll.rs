//! Per-device refresh operations.

use crate::commands;
use chrono::Utc;
use driftwatch_common::{
    AlertSink, ConfigStore, CredentialStore, PollError, PollResult, SessionFactory,
    SnapshotStore, SnmpTransport, WatchWordStore,
};
use driftwatch_drift::{watchword, ConfigDiff, ConfigDiffer, ConfigTracker, DEFAULT_ARCHIVE_KEEP};
use driftwatch_snmp::SnmpResolver;
use driftwatch_types::{AccessMethod, DeviceCredential, DeviceSnapshot};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Structured result of an on-demand single-device refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The device was polled and its snapshot replaced.
    Updated,
    /// The refresh did not produce a new snapshot.
    Skipped {
        /// Human-readable reason.
        reason: String,
    },
}

/// Executes the refresh operations the polling loops are built from.
///
/// Owns no transport itself: sessions come from the [`SessionFactory`], SNMP
/// exchanges go through the resolver, and everything observed lands in the
/// stores. One poller instance is shared by all loops.
pub struct DevicePoller {
    sessions: Arc<dyn SessionFactory>,
    resolver: SnmpResolver,
    snapshots: Arc<dyn SnapshotStore>,
    configs: Arc<dyn ConfigStore>,
    credentials: Arc<dyn CredentialStore>,
    watchwords: Arc<dyn WatchWordStore>,
    alerts: Arc<dyn AlertSink>,
    tracker: ConfigTracker,
    differ: ConfigDiffer,
    sample_interval: Duration,
}

impl DevicePoller {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<dyn SessionFactory>,
        transport: Arc<dyn SnmpTransport>,
        snapshots: Arc<dyn SnapshotStore>,
        configs: Arc<dyn ConfigStore>,
        credentials: Arc<dyn CredentialStore>,
        watchwords: Arc<dyn WatchWordStore>,
        alerts: Arc<dyn AlertSink>,
        sample_interval: Duration,
    ) -> Self {
        Self {
            sessions,
            resolver: SnmpResolver::new(transport),
            snapshots,
            configs: configs.clone(),
            credentials,
            watchwords,
            alerts,
            tracker: ConfigTracker::new(configs.clone()),
            differ: ConfigDiffer::new(configs),
            sample_interval,
        }
    }

    /// Polls a device's identity and interface state and replaces its
    /// current snapshot.
    ///
    /// A `None` from the session factory means the device is unreachable or
    /// rejected its credentials; the error propagates so the caller marks
    /// the device inactive without any snapshot write.
    pub async fn refresh_device_info(
        &self,
        cred: &DeviceCredential,
        method: AccessMethod,
    ) -> PollResult<()> {
        let mut session = self
            .sessions
            .connect(cred)
            .await
            .ok_or_else(|| PollError::connection(&cred.address))?;

        let with_bandwidth = method == AccessMethod::Cli;
        let gathered = commands::gather(&mut *session, cred.kind, with_bandwidth).await;
        session.close().await;
        let outputs = gathered?;

        let facts = driftwatch_extract::extract(cred.kind, &outputs);
        let unique_id = facts
            .hardware_address
            .clone()
            .unwrap_or_else(|| cred.unique_id.clone());

        let mut interfaces = facts.interfaces;
        if method == AccessMethod::Snmp {
            if let Some(community) = cred.snmp_community.as_deref() {
                let indexes = self
                    .resolver
                    .interface_indexes(&cred.address, community)
                    .await?;
                for record in &mut interfaces {
                    let Some(&if_index) = indexes.get(&record.name) else {
                        debug!(address = %cred.address, interface = %record.name,
                            "interface not in SNMP table, skipping enrichment");
                        continue;
                    };
                    record.max_speed_mbps = self
                        .resolver
                        .max_speed(&cred.address, community, if_index)
                        .await;
                    match self
                        .resolver
                        .throughput(&cred.address, community, if_index, self.sample_interval)
                        .await
                    {
                        Ok(tp) => {
                            record.mbps_in = Some(tp.mbps_in);
                            record.mbps_out = Some(tp.mbps_out);
                        }
                        Err(PollError::CounterWrap { .. }) => {
                            warn!(address = %cred.address, interface = %record.name,
                                "counter wrap, leaving throughput unset this cycle");
                        }
                        Err(error) => {
                            warn!(address = %cred.address, interface = %record.name, %error,
                                "throughput sample failed");
                        }
                    }
                }
            } else {
                debug!(address = %cred.address, "no SNMP community, skipping enrichment");
            }
        }

        let snapshot = DeviceSnapshot::new(
            unique_id,
            facts.hostname,
            cred.kind,
            interfaces,
            facts.neighbors,
            Utc::now(),
        );
        let interface_count = snapshot.interfaces.len();
        self.snapshots.archive_and_replace(snapshot).await?;
        info!(address = %cred.address, interface_count, "device info refreshed");
        Ok(())
    }

    /// Re-measures throughput for every interface of the device's current
    /// snapshot and updates the figures in place.
    pub async fn refresh_throughput(&self, cred: &DeviceCredential) -> PollResult<()> {
        let Some(community) = cred.snmp_community.as_deref() else {
            debug!(address = %cred.address, "no SNMP community, skipping throughput");
            return Ok(());
        };
        let Some(snapshot) = self.snapshots.get_current(&cred.unique_id).await? else {
            debug!(address = %cred.address, "no snapshot yet, skipping throughput");
            return Ok(());
        };

        let indexes = self
            .resolver
            .interface_indexes(&cred.address, community)
            .await?;
        for iface in &snapshot.interfaces {
            let Some(&if_index) = indexes.get(&iface.name) else {
                continue;
            };
            match self
                .resolver
                .throughput(&cred.address, community, if_index, self.sample_interval)
                .await
            {
                Ok(tp) => {
                    self.snapshots
                        .update_throughput(&cred.unique_id, &iface.name, tp.mbps_in, tp.mbps_out)
                        .await?;
                }
                Err(PollError::CounterWrap { .. }) => {
                    warn!(address = %cred.address, interface = %iface.name,
                        "counter wrap, keeping previous throughput");
                }
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }

    /// Captures the running configuration, versions it, and on change runs
    /// drift detection and watchword alerting.
    ///
    /// A store failure during capture is logged and skips drift detection
    /// for this device this round; the device is not marked inactive.
    pub async fn refresh_config(&self, cred: &DeviceCredential) -> PollResult<()> {
        let mut session = self
            .sessions
            .connect(cred)
            .await
            .ok_or_else(|| PollError::connection(&cred.address))?;
        let captured = session
            .run_command(commands::config_command(cred.kind))
            .await;
        session.close().await;
        let raw = captured?;

        let changed = match self.tracker.capture(&cred.unique_id, &raw).await {
            Ok(changed) => changed,
            Err(error @ PollError::Store { .. }) => {
                warn!(address = %cred.address, %error,
                    "configuration store failure, skipping drift detection this round");
                return Ok(());
            }
            Err(error) => return Err(error),
        };
        if !changed {
            return Ok(());
        }

        let history = self.configs.get_archive_history(&cred.unique_id).await?;
        if history.is_empty() {
            debug!(address = %cred.address, "first capture, nothing to diff");
            return Ok(());
        }

        let diff = self.differ.diff_latest(&cred.unique_id).await?;
        if diff.is_empty() {
            return Ok(());
        }

        let watchwords = self.watchwords.list_all().await?;
        for event in watchword::scan(&cred.unique_id, &diff, &watchwords) {
            info!(description = %event.description, "broadcasting alert");
            self.alerts.broadcast(event);
        }
        Ok(())
    }

    /// Trims a device's configuration archive to the retention default.
    /// Maintenance operation driven by the config loop, not by capture.
    pub async fn trim_config_archive(&self, unique_id: &str) -> PollResult<usize> {
        self.tracker
            .trim_archive(unique_id, DEFAULT_ARCHIVE_KEEP)
            .await
    }

    /// On-demand refresh of one device by management address.
    ///
    /// Never returns an error: failures come back as a structured
    /// [`RefreshOutcome::Skipped`], with the device marked inactive when the
    /// failure class warrants it.
    pub async fn refresh_by_address(
        &self,
        address: &str,
        method: AccessMethod,
    ) -> RefreshOutcome {
        let cred = match self.credentials.get_by_address(address).await {
            Ok(Some(cred)) => cred,
            Ok(None) => {
                return RefreshOutcome::Skipped {
                    reason: format!("no credential for {address}"),
                }
            }
            Err(error) => {
                return RefreshOutcome::Skipped {
                    reason: error.to_string(),
                }
            }
        };

        match self.refresh_device_info(&cred, method).await {
            Ok(()) => RefreshOutcome::Updated,
            Err(error) => {
                warn!(address, %error, "on-demand refresh failed");
                if error.marks_inactive() {
                    if let Err(store_error) = self.snapshots.mark_inactive(&cred.unique_id).await {
                        warn!(address, %store_error, "failed to mark device inactive");
                    }
                }
                RefreshOutcome::Skipped {
                    reason: error.to_string(),
                }
            }
        }
    }

    /// Latest snapshot per device, newest capture winning when a store
    /// reports more than one record for the same identity.
    pub async fn latest_snapshots(&self) -> PollResult<Vec<DeviceSnapshot>> {
        let mut latest: HashMap<String, DeviceSnapshot> = HashMap::new();
        for snapshot in self.snapshots.list_current().await? {
            match latest.get(&snapshot.unique_id) {
                Some(existing) if existing.raw_date >= snapshot.raw_date => {}
                _ => {
                    latest.insert(snapshot.unique_id.clone(), snapshot);
                }
            }
        }
        Ok(latest.into_values().collect())
    }

    /// Current-vs-latest-archive configuration diff for a device, looked up
    /// by management address.
    pub async fn config_diff(&self, address: &str) -> PollResult<ConfigDiff> {
        let cred = self
            .credentials
            .get_by_address(address)
            .await?
            .ok_or_else(|| PollError::parse(format!("no credential for {address}")))?;
        self.differ.diff_latest(&cred.unique_id).await
    }

    /// Flips a device's snapshot to inactive.
    pub async fn mark_inactive(&self, unique_id: &str) -> PollResult<()> {
        self.snapshots.mark_inactive(unique_id).await
    }
}
