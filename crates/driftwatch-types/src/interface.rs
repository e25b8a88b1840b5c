//! Normalized per-interface state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SNMP interface state as reported by ifAdminStatus/ifOperStatus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Up,
    Down,
    Testing,
    /// Anything outside the 1/2/3 code space, or an unreachable agent.
    Unknown,
}

impl PortState {
    /// Maps the SNMP integer code. Codes outside 1..=3 map to `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => PortState::Up,
            2 => PortState::Down,
            3 => PortState::Testing,
            _ => PortState::Unknown,
        }
    }

    /// Returns the lowercase state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PortState::Up => "up",
            PortState::Down => "down",
            PortState::Testing => "testing",
            PortState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Administrative/operational status pair, displayed as `admin/oper`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceStatus {
    /// Administrative status (configured state).
    pub admin: String,
    /// Operational status (line protocol state).
    pub oper: String,
}

impl InterfaceStatus {
    /// Creates a status pair.
    pub fn new(admin: impl Into<String>, oper: impl Into<String>) -> Self {
        Self {
            admin: admin.into(),
            oper: oper.into(),
        }
    }
}

impl fmt::Display for InterfaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.admin, self.oper)
    }
}

/// Detailed bandwidth figures parsed from a full `show interfaces` dump.
///
/// Every field is best-effort: a line the vendor did not print leaves the
/// field at its default instead of failing the extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandwidthDetail {
    /// Configured maximum bandwidth in Mbps.
    pub bandwidth_max_mbps: Option<f64>,
    /// Maximum transmission unit.
    pub mtu: Option<u32>,
    /// Raw transmit load on the vendor 0-255 scale.
    pub txload_raw: u32,
    /// Transmit load as a percentage (raw / 255 * 100).
    pub txload_percent: f64,
    /// Raw receive load on the vendor 0-255 scale.
    pub rxload_raw: u32,
    /// Receive load as a percentage (raw / 255 * 100).
    pub rxload_percent: f64,
    /// 5-minute input rate in kbps.
    pub input_rate_kbps: f64,
    /// 5-minute output rate in kbps.
    pub output_rate_kbps: f64,
    /// CRC error count.
    pub crc_errors: u64,
    /// Total input errors.
    pub input_errors: u64,
    /// Total output errors.
    pub output_errors: u64,
}

/// One interface of a device snapshot.
///
/// Rebuilt wholesale on every successful poll; there is no incremental merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    /// Interface name as the vendor reports it.
    pub name: String,
    /// Assigned address; `None` when the vendor reports it unassigned.
    pub address: Option<String>,
    /// Administrative/operational status pair.
    pub status: InterfaceStatus,
    /// Maximum link speed in Mbps (ifHighSpeed), when known.
    pub max_speed_mbps: Option<u64>,
    /// Measured inbound throughput in Mbps, when sampled.
    pub mbps_in: Option<f64>,
    /// Measured outbound throughput in Mbps, when sampled.
    pub mbps_out: Option<f64>,
    /// CLI-method bandwidth detail block, when gathered.
    pub bandwidth: Option<BandwidthDetail>,
}

impl InterfaceRecord {
    /// Creates a record with identity and status only.
    pub fn new(name: impl Into<String>, address: Option<String>, status: InterfaceStatus) -> Self {
        Self {
            name: name.into(),
            address,
            status,
            max_speed_mbps: None,
            mbps_in: None,
            mbps_out: None,
            bandwidth: None,
        }
    }
}

/// One CDP neighbor entry (Cisco only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborRecord {
    /// Peer device identifier.
    pub device_id: String,
    /// Local interface facing the peer.
    pub local_interface: String,
    /// Remote port identifier.
    pub port_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_state_codes() {
        assert_eq!(PortState::from_code(1), PortState::Up);
        assert_eq!(PortState::from_code(2), PortState::Down);
        assert_eq!(PortState::from_code(3), PortState::Testing);
        assert_eq!(PortState::from_code(0), PortState::Unknown);
        assert_eq!(PortState::from_code(7), PortState::Unknown);
        assert_eq!(PortState::from_code(-1), PortState::Unknown);
    }

    #[test]
    fn test_interface_status_display() {
        let status = InterfaceStatus::new("up", "down");
        assert_eq!(status.to_string(), "up/down");
    }

    #[test]
    fn test_interface_record_defaults() {
        let rec = InterfaceRecord::new(
            "GigabitEthernet0/0",
            Some("192.0.2.1".to_string()),
            InterfaceStatus::new("up", "up"),
        );
        assert!(rec.max_speed_mbps.is_none());
        assert!(rec.mbps_in.is_none());
        assert!(rec.bandwidth.is_none());
    }

    #[test]
    fn test_bandwidth_detail_default_is_zeroed() {
        let bw = BandwidthDetail::default();
        assert!(bw.bandwidth_max_mbps.is_none());
        assert_eq!(bw.crc_errors, 0);
        assert_eq!(bw.txload_percent, 0.0);
    }
}
