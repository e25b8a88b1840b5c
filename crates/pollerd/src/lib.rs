//! Poll orchestration daemon.
//!
//! Drives three independent repeating loops over every provisioned device:
//! identity and interface-state refresh, throughput re-measurement, and
//! configuration capture with drift detection and watchword alerting.
//! Transport and persistence are reached only through the contracts in
//! `driftwatch-common`; this crate ships in-memory stores and a broadcast
//! alert sink for the daemon's default wiring and for tests.

pub mod broadcast;
pub mod commands;
pub mod device_poll;
pub mod orchestrator;
pub mod settings;
pub mod store;

pub use broadcast::BroadcastAlertSink;
pub use device_poll::{DevicePoller, RefreshOutcome};
pub use orchestrator::Orchestrator;
pub use settings::PollSettings;
pub use store::{
    MemoryConfigStore, MemoryCredentialStore, MemorySnapshotStore, MemoryWatchWordStore,
};
