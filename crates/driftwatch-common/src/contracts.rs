//! Contracts for external collaborators.
//!
//! The polling core never opens sockets or touches a database itself. It
//! drives these traits, which deployments implement with their transport and
//! persistence of choice. The contracts are deliberately narrow: a session
//! runs one textual command, the SNMP transport does one GET or GETBULK, and
//! the stores expose exactly the operations the poll cycle needs.

use crate::error::PollResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use driftwatch_types::{
    AlertEvent, ConfigVersion, DeviceCredential, DeviceSnapshot, WatchWord,
};

/// An established command session to one device.
#[async_trait]
pub trait DeviceSession: Send {
    /// Runs one command and returns the raw vendor output.
    async fn run_command(&mut self, command: &str) -> PollResult<String>;

    /// Closes the session. Errors are swallowed by callers; a session that
    /// fails to close cleanly is already unusable.
    async fn close(&mut self);
}

/// Opens command sessions to devices.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Connects to the device described by the credential.
    ///
    /// Never errors: `None` signals an unreachable device or rejected
    /// credentials and the caller marks the device inactive.
    async fn connect(&self, credential: &DeviceCredential) -> Option<Box<dyn DeviceSession>>;
}

/// A single typed SNMP value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnmpValue {
    /// INTEGER / Integer32.
    Integer(i64),
    /// Counter64 / Gauge32 and friends.
    Counter64(u64),
    /// OCTET STRING, already decoded to text.
    OctetString(String),
}

impl SnmpValue {
    /// Returns the value as an unsigned integer, when it is numeric.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            SnmpValue::Integer(v) if *v >= 0 => Some(*v as u64),
            SnmpValue::Integer(_) => None,
            SnmpValue::Counter64(v) => Some(*v),
            SnmpValue::OctetString(s) => s.parse().ok(),
        }
    }

    /// Returns the value as a signed integer, when it is numeric.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SnmpValue::Integer(v) => Some(*v),
            SnmpValue::Counter64(v) => i64::try_from(*v).ok(),
            SnmpValue::OctetString(s) => s.parse().ok(),
        }
    }

    /// Returns the value as text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SnmpValue::OctetString(s) => Some(s),
            _ => None,
        }
    }
}

/// Performs single SNMP protocol exchanges.
///
/// `None` covers every transport-level failure: timeout, error indication,
/// or error status. The resolver decides what that means for the poll.
#[async_trait]
pub trait SnmpTransport: Send + Sync {
    /// SNMP GET for one OID.
    async fn get(&self, address: &str, community: &str, oid: &str) -> Option<SnmpValue>;

    /// SNMP GETBULK starting at `oid`, returning varbinds in agent order.
    async fn get_bulk(
        &self,
        address: &str,
        community: &str,
        oid: &str,
        max_repetitions: u32,
    ) -> Option<Vec<(String, SnmpValue)>>;
}

/// Persists the current snapshot per device plus an append-only archive.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns the current snapshot for a device, if any.
    async fn get_current(&self, unique_id: &str) -> PollResult<Option<DeviceSnapshot>>;

    /// Returns the current snapshot of every known device.
    async fn list_current(&self) -> PollResult<Vec<DeviceSnapshot>>;

    /// Moves the existing current snapshot (if any) to the archive and
    /// installs `snapshot` as current.
    async fn archive_and_replace(&self, snapshot: DeviceSnapshot) -> PollResult<()>;

    /// Updates measured throughput for one interface of the current snapshot
    /// in place, without archiving.
    async fn update_throughput(
        &self,
        unique_id: &str,
        interface: &str,
        mbps_in: f64,
        mbps_out: f64,
    ) -> PollResult<()>;

    /// Flips the current snapshot's status to inactive. A device with no
    /// snapshot yet is a no-op.
    async fn mark_inactive(&self, unique_id: &str) -> PollResult<()>;
}

/// Persists the current configuration per device plus an archive.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Returns the current configuration version for a device, if any.
    async fn get_current(&self, unique_id: &str) -> PollResult<Option<ConfigVersion>>;

    /// Moves the existing current version (if any) verbatim to the archive
    /// and installs the given text as current with the given timestamp.
    async fn archive_and_replace(
        &self,
        unique_id: &str,
        configuration: &str,
        captured_at: DateTime<Utc>,
    ) -> PollResult<()>;

    /// Returns archived versions for a device, newest first.
    async fn get_archive_history(&self, unique_id: &str) -> PollResult<Vec<ConfigVersion>>;

    /// Deletes archived versions beyond the `keep` most recent.
    /// Returns how many were deleted.
    async fn prune_archive(&self, unique_id: &str, keep: usize) -> PollResult<usize>;
}

/// Read access to operator-provisioned device credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// All known credentials, in the operator-defined order.
    async fn list_all(&self) -> PollResult<Vec<DeviceCredential>>;

    /// Looks up a credential by management address.
    async fn get_by_address(&self, address: &str) -> PollResult<Option<DeviceCredential>>;
}

/// Read access to the operator-maintained watchword list.
#[async_trait]
pub trait WatchWordStore: Send + Sync {
    /// All watchwords.
    async fn list_all(&self) -> PollResult<Vec<WatchWord>>;
}

/// Fans alert events out to whoever is listening right now.
pub trait AlertSink: Send + Sync {
    /// Delivers an event to all current subscribers. Delivery is best-effort;
    /// events are never persisted.
    fn broadcast(&self, event: AlertEvent);
}
