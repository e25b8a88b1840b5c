//! The three polling loops.

use crate::device_poll::DevicePoller;
use crate::settings::PollSettings;
use driftwatch_common::{CredentialStore, PollError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Drives the device-info, throughput, and configuration-drift loops.
///
/// Each loop is an independent task: list credentials, visit every device
/// strictly sequentially in list order, sleep, repeat — forever. A failing
/// device is logged and marked inactive; it never stops the pass, and a slow
/// pass in one loop never blocks the other two.
pub struct Orchestrator {
    poller: Arc<DevicePoller>,
    credentials: Arc<dyn CredentialStore>,
    settings: PollSettings,
}

impl Orchestrator {
    pub fn new(
        poller: Arc<DevicePoller>,
        credentials: Arc<dyn CredentialStore>,
        settings: PollSettings,
    ) -> Self {
        Self {
            poller,
            credentials,
            settings,
        }
    }

    /// Spawns the three loops and returns their handles. The tasks run until
    /// the process terminates.
    pub fn start_polling(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        info!(
            method = %self.settings.method.as_str(),
            info_interval_secs = self.settings.info_interval.as_secs(),
            throughput_interval_secs = self.settings.throughput_interval.as_secs(),
            config_interval_secs = self.settings.config_interval.as_secs(),
            "starting polling loops"
        );

        let info = {
            let this = self.clone();
            tokio::spawn(async move {
                loop {
                    this.run_info_pass().await;
                    tokio::time::sleep(this.settings.info_interval).await;
                }
            })
        };

        let throughput = {
            let this = self.clone();
            tokio::spawn(async move {
                loop {
                    this.run_throughput_pass().await;
                    tokio::time::sleep(this.settings.throughput_interval).await;
                }
            })
        };

        let config = {
            let this = self;
            tokio::spawn(async move {
                loop {
                    this.run_config_pass().await;
                    tokio::time::sleep(this.settings.config_interval).await;
                }
            })
        };

        vec![info, throughput, config]
    }

    /// One device-info pass over all credentials.
    pub async fn run_info_pass(&self) {
        for cred in self.list_credentials().await {
            if let Err(error) = self
                .poller
                .refresh_device_info(&cred, self.settings.method)
                .await
            {
                self.isolate(&cred.address, &cred.unique_id, error).await;
            }
        }
    }

    /// One throughput pass over all credentials.
    pub async fn run_throughput_pass(&self) {
        for cred in self.list_credentials().await {
            if let Err(error) = self.poller.refresh_throughput(&cred).await {
                self.isolate(&cred.address, &cred.unique_id, error).await;
            }
        }
    }

    /// One configuration-drift pass over all credentials, trimming each
    /// device's archive to the retention limit afterwards.
    pub async fn run_config_pass(&self) {
        for cred in self.list_credentials().await {
            if let Err(error) = self.poller.refresh_config(&cred).await {
                self.isolate(&cred.address, &cred.unique_id, error).await;
                continue;
            }
            if let Err(error) = self.poller.trim_config_archive(&cred.unique_id).await {
                warn!(address = %cred.address, %error, "archive trim failed");
            }
        }
    }

    async fn list_credentials(&self) -> Vec<driftwatch_types::DeviceCredential> {
        match self.credentials.list_all().await {
            Ok(creds) => creds,
            Err(error) => {
                warn!(%error, "failed to list credentials, skipping pass");
                Vec::new()
            }
        }
    }

    /// Per-device failure handling: log, mark inactive when warranted, move
    /// on to the next device.
    async fn isolate(&self, address: &str, unique_id: &str, error: PollError) {
        warn!(address, %error, "device poll failed");
        if error.marks_inactive() {
            if let Err(store_error) = self.poller.mark_inactive(unique_id).await {
                warn!(address, %store_error, "failed to mark device inactive");
            }
        }
    }
}
