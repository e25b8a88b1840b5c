//! Device identity, vendor/OS tagging, and access credentials.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of supported vendor/OS combinations.
///
/// Extraction and command selection dispatch on this enum with exhaustive
/// matches, so adding a variant forces every branch to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Cisco IOS / IOS-XE style devices.
    CiscoIos,
    /// Cisco IOS XR style devices.
    CiscoXr,
    /// Juniper Junos style devices.
    JuniperJunos,
}

impl DeviceKind {
    /// Returns the canonical tag used in credential records.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::CiscoIos => "cisco_ios",
            DeviceKind::CiscoXr => "cisco_xr",
            DeviceKind::JuniperJunos => "juniper_junos",
        }
    }

    /// Returns true for any Cisco OS variant.
    pub fn is_cisco(&self) -> bool {
        matches!(self, DeviceKind::CiscoIos | DeviceKind::CiscoXr)
    }

    /// Returns true for any Juniper OS variant.
    pub fn is_juniper(&self) -> bool {
        matches!(self, DeviceKind::JuniperJunos)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a device type tag is not recognized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown device kind tag: '{tag}'")]
pub struct UnknownDeviceKind {
    /// The tag that failed to parse.
    pub tag: String,
}

impl FromStr for DeviceKind {
    type Err = UnknownDeviceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cisco_ios" => Ok(DeviceKind::CiscoIos),
            "cisco_xr" => Ok(DeviceKind::CiscoXr),
            "juniper_junos" => Ok(DeviceKind::JuniperJunos),
            other => Err(UnknownDeviceKind {
                tag: other.to_string(),
            }),
        }
    }
}

/// How the poller talks to a device for info/throughput refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMethod {
    /// Terminal session commands only; bandwidth comes from `show interfaces`.
    Cli,
    /// Terminal session for identity, SNMP for speed and throughput.
    Snmp,
}

impl AccessMethod {
    /// Returns the method name used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMethod::Cli => "cli",
            AccessMethod::Snmp => "snmp",
        }
    }
}

impl FromStr for AccessMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cli" => Ok(AccessMethod::Cli),
            "snmp" => Ok(AccessMethod::Snmp),
            other => Err(format!("unknown access method: '{other}'")),
        }
    }
}

/// Operator-provisioned access record for one device.
///
/// Read-only to the polling core. `unique_id` is the device's hardware
/// address and identifies the device across polls regardless of readdressing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCredential {
    /// Vendor/OS combination.
    pub kind: DeviceKind,
    /// Stable device identity (hardware address).
    pub unique_id: String,
    /// Management address the poller connects to.
    pub address: String,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Privileged-mode secret, when the platform needs one.
    pub secret: Option<String>,
    /// SNMP community; absent means SNMP enrichment is unavailable.
    pub snmp_community: Option<String>,
}

impl DeviceCredential {
    /// Creates a credential with only the required fields set.
    pub fn new(
        kind: DeviceKind,
        unique_id: impl Into<String>,
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            unique_id: unique_id.into(),
            address: address.into(),
            username: username.into(),
            password: password.into(),
            secret: None,
            snmp_community: None,
        }
    }

    /// Sets the SNMP community.
    pub fn with_snmp_community(mut self, community: impl Into<String>) -> Self {
        self.snmp_community = Some(community.into());
        self
    }
}
