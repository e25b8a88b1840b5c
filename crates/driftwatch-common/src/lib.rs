//! Common infrastructure for the driftwatch polling engine.
//!
//! Holds the [`PollError`] taxonomy shared by every component and the async
//! trait contracts through which the engine consumes its external
//! collaborators: raw access adapters (terminal session, SNMP transport),
//! the snapshot/configuration/credential/watchword stores, and the alert
//! sink. Transport and persistence implementations live outside the core.

pub mod contracts;
pub mod error;

pub use contracts::{
    AlertSink, ConfigStore, CredentialStore, DeviceSession, SessionFactory, SnapshotStore,
    SnmpTransport, SnmpValue, WatchWordStore,
};
pub use error::{PollError, PollResult};
