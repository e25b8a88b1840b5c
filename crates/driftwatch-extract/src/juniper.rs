//! Juniper Junos output extraction.

use crate::bandwidth;
use crate::{CommandOutputs, DeviceFacts};
use driftwatch_types::{InterfaceRecord, InterfaceStatus};
use once_cell::sync::Lazy;
use regex::Regex;

static HARDWARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Hardware address: (\S+)").expect("hardware regex"));

static HOSTNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"host-name\s+(\S+);").expect("hostname regex"));

// Terse lines: interface, admin, link, then optional protocol and address:
//   ge-0/0/0.0              up    up   inet     192.0.2.1/24
//   sp-0/0/0.16383          up    up   inet     10.0.0.1 --> 10.0.0.16
static TERSE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)\s+(\S+)\s+(\S+)(?:\s+(\S+)\s+([\d./]+)(?:\s+-->\s+([\d./]+))?)?")
        .expect("terse line regex")
});

/// Extracts normalized facts from Junos command outputs.
pub fn extract(outputs: &CommandOutputs) -> DeviceFacts {
    DeviceFacts {
        hardware_address: extract_hardware_address(&outputs.hardware),
        hostname: extract_hostname(&outputs.hostname),
        interfaces: extract_interfaces(&outputs.interfaces, outputs.all_interfaces.as_deref()),
        neighbors: Vec::new(),
    }
}

/// First `Hardware address: <token>` match in the output.
pub fn extract_hardware_address(output: &str) -> Option<String> {
    HARDWARE_RE.captures(output).map(|c| c[1].to_string())
}

/// First `host-name <token>;` match in the output.
pub fn extract_hostname(output: &str) -> Option<String> {
    HOSTNAME_RE.captures(output).map(|c| c[1].to_string())
}

/// Parses `show interfaces terse` output.
pub fn extract_interfaces(
    terse_output: &str,
    all_interfaces: Option<&str>,
) -> Vec<InterfaceRecord> {
    let mut records = Vec::new();
    for line in terse_output.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let Some(caps) = TERSE_LINE_RE.captures(line) else {
            continue;
        };

        let name = caps[1].to_string();
        let status = InterfaceStatus::new(&caps[2], &caps[3]);
        let address = caps.get(5).map(|m| m.as_str().to_string());

        let mut record = InterfaceRecord::new(name.clone(), address, status);
        if let Some(dump) = all_interfaces {
            // Logical units share the physical interface's bandwidth block.
            let base = name.split('.').next().unwrap_or(&name);
            record.bandwidth = bandwidth::juniper_interface_section(dump, base)
                .map(|section| bandwidth::parse_juniper_section(&section));
        }
        records.push(record);
    }
    records
}
