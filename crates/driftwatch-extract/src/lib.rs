//! Vendor Extraction Engine.
//!
//! Turns raw per-vendor command output into a normalized [`DeviceFacts`]
//! tuple: hardware address, hostname, ordered interface list, and (Cisco
//! only) CDP neighbor list. Extraction never fails — a pattern that does not
//! match leaves the field `None` or the list empty, and the caller decides
//! what that means for the poll.
//!
//! Dispatch is an exhaustive match on [`DeviceKind`], so there is no
//! "unsupported vendor string" case at runtime.

pub mod bandwidth;
pub mod cisco;
pub mod juniper;

use driftwatch_types::{DeviceKind, InterfaceRecord, NeighborRecord};

/// Raw command outputs gathered from one device in one pass.
#[derive(Debug, Clone, Default)]
pub struct CommandOutputs {
    /// Output of the hostname-revealing command.
    pub hostname: String,
    /// Output of the interface brief/terse command.
    pub interfaces: String,
    /// Output of the hardware-address-revealing command.
    pub hardware: String,
    /// CDP neighbor table output (Cisco only).
    pub neighbors: Option<String>,
    /// Full `show interfaces` dump for bandwidth detail (CLI method only).
    pub all_interfaces: Option<String>,
}

/// Normalized result of extracting one device's command outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceFacts {
    /// Hardware address, when the output revealed one.
    pub hardware_address: Option<String>,
    /// Hostname, when the configuration revealed one.
    pub hostname: Option<String>,
    /// Interfaces in the order the device listed them.
    pub interfaces: Vec<InterfaceRecord>,
    /// CDP neighbors; always empty for Juniper.
    pub neighbors: Vec<NeighborRecord>,
}

/// Extracts normalized facts from vendor command outputs.
pub fn extract(kind: DeviceKind, outputs: &CommandOutputs) -> DeviceFacts {
    match kind {
        DeviceKind::CiscoIos => cisco::extract(cisco::CiscoVariant::Ios, outputs),
        DeviceKind::CiscoXr => cisco::extract(cisco::CiscoVariant::Xr, outputs),
        DeviceKind::JuniperJunos => juniper::extract(outputs),
    }
}
