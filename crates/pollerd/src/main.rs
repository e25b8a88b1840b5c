//! Poll orchestrator daemon entry point.

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use driftwatch_common::{DeviceSession, SessionFactory, SnmpTransport, SnmpValue};
use driftwatch_pollerd::{
    BroadcastAlertSink, DevicePoller, MemoryConfigStore, MemoryCredentialStore,
    MemorySnapshotStore, MemoryWatchWordStore, Orchestrator, PollSettings,
};
use driftwatch_types::{DeviceCredential, WatchWord};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pollerd", about = "Network telemetry and drift poller")]
struct Args {
    /// JSON file with the device credential list.
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// JSON file with the watchword list.
    #[arg(long)]
    watchwords: Option<PathBuf>,
}

/// Placeholder session factory until the terminal adapter is wired in.
/// Reports every device unreachable, which the loops log and tolerate.
// TODO: replace with the production terminal-automation adapter.
struct UnwiredSessionFactory;

#[async_trait]
impl SessionFactory for UnwiredSessionFactory {
    async fn connect(&self, credential: &DeviceCredential) -> Option<Box<dyn DeviceSession>> {
        warn!(address = %credential.address, "no terminal adapter wired, device unreachable");
        None
    }
}

/// Placeholder SNMP transport until the production stack is wired in.
// TODO: replace with the production SNMP adapter.
struct UnwiredSnmpTransport;

#[async_trait]
impl SnmpTransport for UnwiredSnmpTransport {
    async fn get(&self, _address: &str, _community: &str, _oid: &str) -> Option<SnmpValue> {
        None
    }

    async fn get_bulk(
        &self,
        _address: &str,
        _community: &str,
        _oid: &str,
        _max_repetitions: u32,
    ) -> Option<Vec<(String, SnmpValue)>> {
        None
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    info!("starting pollerd");
    let args = Args::parse();
    let settings = PollSettings::from_env();

    let credentials: Vec<DeviceCredential> = match &args.credentials {
        Some(path) => load_json(path)?,
        None => Vec::new(),
    };
    let watchwords: Vec<WatchWord> = match &args.watchwords {
        Some(path) => load_json(path)?,
        None => Vec::new(),
    };
    info!(
        devices = credentials.len(),
        watchwords = watchwords.len(),
        "loaded operator data"
    );

    let credential_store = Arc::new(MemoryCredentialStore::new(credentials));
    let poller = Arc::new(DevicePoller::new(
        Arc::new(UnwiredSessionFactory),
        Arc::new(UnwiredSnmpTransport),
        Arc::new(MemorySnapshotStore::new()),
        Arc::new(MemoryConfigStore::new()),
        credential_store.clone(),
        Arc::new(MemoryWatchWordStore::new(watchwords)),
        Arc::new(BroadcastAlertSink::new()),
        settings.sample_interval,
    ));

    let orchestrator = Arc::new(Orchestrator::new(poller, credential_store, settings));
    for handle in orchestrator.start_polling() {
        handle.await?;
    }
    Ok(())
}
