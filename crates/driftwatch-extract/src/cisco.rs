//! Cisco IOS and IOS XR output extraction.

use crate::bandwidth;
use crate::{CommandOutputs, DeviceFacts};
use driftwatch_types::{InterfaceRecord, InterfaceStatus, NeighborRecord};
use once_cell::sync::Lazy;
use regex::Regex;

/// OS variant within the Cisco family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiscoVariant {
    Ios,
    Xr,
}

impl CiscoVariant {
    /// Lines of banner to skip before the interface table body.
    /// XR prints a longer banner than IOS.
    pub fn header_skip(&self) -> usize {
        match self {
            CiscoVariant::Ios => 1,
            CiscoVariant::Xr => 4,
        }
    }
}

static HARDWARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"address is\s+([\w.]+)").expect("hardware regex"));

static HOSTNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"hostname\s+(\S+)").expect("hostname regex"));

// IOS brief lines carry OK/method columns between the address and the status:
//   Ethernet0/0     192.0.2.74      YES manual up                    up
static IOS_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)\s+(\S+)\s+\S+\s+\S+\s+(\S+)\s+(\S+)").expect("ios line regex")
});

// XR brief lines are four columns:
//   GigabitEthernet0/0/0/0   192.0.2.78      Up              Up       default
static XR_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)\s+(\S+)\s+(\S+)\s+(\S+)").expect("xr line regex"));

static NEIGHBOR_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("neighbor split regex"));

/// Extracts normalized facts from Cisco command outputs.
pub fn extract(variant: CiscoVariant, outputs: &CommandOutputs) -> DeviceFacts {
    DeviceFacts {
        hardware_address: extract_hardware_address(&outputs.hardware),
        hostname: extract_hostname(&outputs.hostname),
        interfaces: extract_interfaces(
            variant,
            &outputs.interfaces,
            outputs.all_interfaces.as_deref(),
        ),
        neighbors: outputs
            .neighbors
            .as_deref()
            .map(extract_neighbors)
            .unwrap_or_default(),
    }
}

/// First `address is <token>` match in the output.
pub fn extract_hardware_address(output: &str) -> Option<String> {
    HARDWARE_RE
        .captures(output)
        .map(|c| c[1].to_string())
}

/// First `hostname <token>` match in the output.
pub fn extract_hostname(output: &str) -> Option<String> {
    HOSTNAME_RE.captures(output).map(|c| c[1].to_string())
}

/// Parses the `show ip interface brief` table body.
pub fn extract_interfaces(
    variant: CiscoVariant,
    brief_output: &str,
    all_interfaces: Option<&str>,
) -> Vec<InterfaceRecord> {
    let line_re: &Regex = match variant {
        CiscoVariant::Ios => &IOS_LINE_RE,
        CiscoVariant::Xr => &XR_LINE_RE,
    };

    let mut records = Vec::new();
    for line in brief_output.lines().skip(variant.header_skip()) {
        let Some(caps) = line_re.captures(line) else {
            continue;
        };

        let name = caps[1].to_string();
        let address = parse_address(&caps[2]);
        let status = InterfaceStatus::new(&caps[3], &caps[4]);

        let mut record = InterfaceRecord::new(name.clone(), address, status);
        if let Some(dump) = all_interfaces {
            record.bandwidth = bandwidth::cisco_interface_section(dump, &name)
                .map(|section| bandwidth::parse_cisco_section(&section));
        }
        records.push(record);
    }
    records
}

/// Parses `show cdp neighbors` output.
///
/// Skips the first line, splits each remaining line on runs of two or more
/// spaces, and accepts lines with at least three fields: peer id, local
/// interface, and the last field as the remote port id.
pub fn extract_neighbors(output: &str) -> Vec<NeighborRecord> {
    let mut neighbors = Vec::new();
    for line in output.lines().skip(1) {
        let parts: Vec<&str> = NEIGHBOR_SPLIT_RE.split(line.trim()).collect();
        if parts.len() >= 3 {
            neighbors.push(NeighborRecord {
                device_id: parts[0].to_string(),
                local_interface: parts[1].to_string(),
                port_id: parts[parts.len() - 1].to_string(),
            });
        }
    }
    neighbors
}

fn parse_address(token: &str) -> Option<String> {
    if token.eq_ignore_ascii_case("unassigned") {
        None
    } else {
        Some(token.to_string())
    }
}
