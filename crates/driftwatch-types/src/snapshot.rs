//! Point-in-time device snapshots.

use crate::device::DeviceKind;
use crate::interface::{InterfaceRecord, NeighborRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of the human-readable `last_updated` field.
pub const LAST_UPDATED_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Reachability status of a device as of its last poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Last poll succeeded.
    Active,
    /// Last poll failed to reach or identify the device.
    Inactive,
}

/// Normalized observation of one device at one instant.
///
/// At most one snapshot is current per `unique_id`; every replacement moves
/// the previous current into an archive untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Stable device identity (hardware address).
    pub unique_id: String,
    /// Extracted hostname, when the configuration revealed one.
    pub hostname: Option<String>,
    /// Vendor/OS combination the snapshot was taken with.
    pub kind: DeviceKind,
    /// Ordered interface list, rebuilt on every poll.
    pub interfaces: Vec<InterfaceRecord>,
    /// CDP neighbor list (Cisco only, empty otherwise).
    pub neighbors: Vec<NeighborRecord>,
    /// Capture instant rendered with [`LAST_UPDATED_FORMAT`].
    pub last_updated: String,
    /// Capture instant.
    pub raw_date: DateTime<Utc>,
    /// Reachability as of this poll.
    pub status: DeviceStatus,
}

impl DeviceSnapshot {
    /// Creates an active snapshot stamped with the given instant.
    pub fn new(
        unique_id: impl Into<String>,
        hostname: Option<String>,
        kind: DeviceKind,
        interfaces: Vec<InterfaceRecord>,
        neighbors: Vec<NeighborRecord>,
        raw_date: DateTime<Utc>,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            hostname,
            kind,
            interfaces,
            neighbors,
            last_updated: raw_date.format(LAST_UPDATED_FORMAT).to_string(),
            raw_date,
            status: DeviceStatus::Active,
        }
    }

    /// Looks up an interface by name.
    pub fn interface(&self, name: &str) -> Option<&InterfaceRecord> {
        self.interfaces.iter().find(|i| i.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::InterfaceStatus;
    use chrono::TimeZone;

    fn sample_snapshot() -> DeviceSnapshot {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        DeviceSnapshot::new(
            "aabb.cc00.0100",
            Some("edge-1".to_string()),
            DeviceKind::CiscoIos,
            vec![InterfaceRecord::new(
                "GigabitEthernet0/0",
                Some("192.0.2.1".to_string()),
                InterfaceStatus::new("up", "up"),
            )],
            vec![],
            at,
        )
    }

    #[test]
    fn test_last_updated_formatting() {
        let snap = sample_snapshot();
        assert_eq!(snap.last_updated, "14-03-2026 09:26:53");
        assert_eq!(snap.status, DeviceStatus::Active);
    }

    #[test]
    fn test_interface_lookup() {
        let snap = sample_snapshot();
        assert!(snap.interface("GigabitEthernet0/0").is_some());
        assert!(snap.interface("GigabitEthernet0/1").is_none());
    }
}
