//! Per-interface bandwidth detail extraction from full interface dumps.
//!
//! The CLI access method gathers one `show interfaces` (Cisco) or
//! `show interfaces extensive` (Juniper) dump per poll and slices out the
//! block belonging to each interface. Every field is best-effort: a missing
//! line leaves the field at its default rather than failing the extraction.

use driftwatch_types::BandwidthDetail;
use once_cell::sync::Lazy;
use regex::Regex;

static BW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"BW\s+(\d+)\s+Kbit").expect("bw regex"));
static MTU_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"MTU\s+(\d+)").expect("mtu regex"));
static TXLOAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"txload\s+(\d+)/255").expect("txload regex"));
static RXLOAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"rxload\s+(\d+)/255").expect("rxload regex"));
static INPUT_RATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"5 minute input rate (\d+) bits/sec").expect("input rate regex"));
static OUTPUT_RATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"5 minute output rate (\d+) bits/sec").expect("output rate regex"));
static CRC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s+CRC").expect("crc regex"));
static INPUT_ERRORS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s+input errors").expect("input errors regex"));
static OUTPUT_ERRORS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s+output errors").expect("output errors regex"));

static JNP_SPEED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Speed:\s+(\d+)mbps").expect("speed regex"));
static JNP_MTU_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"MTU:\s+(\d+)").expect("mtu regex"));
static JNP_INPUT_RATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Input\s+rate\s*:\s*(\d+)\s+bps").expect("input rate regex"));
static JNP_OUTPUT_RATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Output\s+rate\s*:\s*(\d+)\s+bps").expect("output rate regex"));
static JNP_INPUT_ERRORS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Input\s+errors:\s+(\d+)").expect("input errors regex"));
static JNP_OUTPUT_ERRORS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Output\s+errors:\s+(\d+)").expect("output errors regex"));

/// Slices the block of a Cisco `show interfaces` dump belonging to one
/// interface: from its `<name> is ...` status line up to the next line that
/// starts a new interface block (first column is a letter), or end of text.
pub fn cisco_interface_section(dump: &str, name: &str) -> Option<String> {
    let mut lines = dump.lines();
    let header = format!("{name} is ");

    let mut section = Vec::new();
    for line in lines.by_ref() {
        if line.starts_with(&header) {
            section.push(line);
            break;
        }
    }
    if section.is_empty() {
        return None;
    }

    for line in lines {
        // Continuation lines inside a block are indented; a new interface
        // block starts flush left with a letter.
        if line.starts_with(|c: char| c.is_ascii_alphabetic()) {
            break;
        }
        section.push(line);
    }
    Some(section.join("\n"))
}

/// Parses one Cisco interface block into bandwidth detail.
pub fn parse_cisco_section(section: &str) -> BandwidthDetail {
    let txload_raw = capture_u64(&TXLOAD_RE, section).unwrap_or(0) as u32;
    let rxload_raw = capture_u64(&RXLOAD_RE, section).unwrap_or(0) as u32;

    BandwidthDetail {
        bandwidth_max_mbps: capture_u64(&BW_RE, section).map(|kbit| kbit as f64 / 1000.0),
        mtu: capture_u64(&MTU_RE, section).map(|v| v as u32),
        txload_raw,
        txload_percent: load_percent(txload_raw),
        rxload_raw,
        rxload_percent: load_percent(rxload_raw),
        input_rate_kbps: capture_u64(&INPUT_RATE_RE, section).unwrap_or(0) as f64 / 1000.0,
        output_rate_kbps: capture_u64(&OUTPUT_RATE_RE, section).unwrap_or(0) as f64 / 1000.0,
        crc_errors: capture_u64(&CRC_RE, section).unwrap_or(0),
        input_errors: capture_u64(&INPUT_ERRORS_RE, section).unwrap_or(0),
        output_errors: capture_u64(&OUTPUT_ERRORS_RE, section).unwrap_or(0),
    }
}

/// Slices the `Physical interface: <name>, ...` section of a Juniper
/// `show interfaces extensive` dump, up to the next physical interface.
pub fn juniper_interface_section(dump: &str, name: &str) -> Option<String> {
    let header = format!("Physical interface: {name},");
    let start = dump
        .lines()
        .scan(0usize, |offset, line| {
            let this = *offset;
            *offset += line.len() + 1;
            Some((this, line))
        })
        .find(|(_, line)| line.starts_with(&header))
        .map(|(offset, _)| offset)?;

    let rest = &dump[start..];
    let end = rest["Physical interface:".len()..]
        .find("Physical interface:")
        .map(|i| i + "Physical interface:".len())
        .unwrap_or(rest.len());
    Some(rest[..end].to_string())
}

/// Parses one Juniper physical-interface block into bandwidth detail.
///
/// Junos reports rates rather than load counters, so the utilization
/// percentages are derived from the rates against the link speed: input
/// maps to the receive side, output to the transmit side.
pub fn parse_juniper_section(section: &str) -> BandwidthDetail {
    let speed_mbps = capture_u64(&JNP_SPEED_RE, section);
    let input_rate_bps = capture_u64(&JNP_INPUT_RATE_RE, section).unwrap_or(0);
    let output_rate_bps = capture_u64(&JNP_OUTPUT_RATE_RE, section).unwrap_or(0);

    let utilization = |rate_bps: u64| -> f64 {
        match speed_mbps {
            Some(speed) if speed > 0 => {
                round2(rate_bps as f64 / (speed as f64 * 1_000_000.0) * 100.0)
            }
            _ => 0.0,
        }
    };

    BandwidthDetail {
        bandwidth_max_mbps: speed_mbps.map(|v| v as f64),
        mtu: capture_u64(&JNP_MTU_RE, section).map(|v| v as u32),
        txload_raw: 0,
        txload_percent: utilization(output_rate_bps),
        rxload_raw: 0,
        rxload_percent: utilization(input_rate_bps),
        input_rate_kbps: input_rate_bps as f64 / 1000.0,
        output_rate_kbps: output_rate_bps as f64 / 1000.0,
        crc_errors: 0,
        input_errors: capture_u64(&JNP_INPUT_ERRORS_RE, section).unwrap_or(0),
        output_errors: capture_u64(&JNP_OUTPUT_ERRORS_RE, section).unwrap_or(0),
    }
}

/// Percentage on the vendor 0-255 load scale, rounded to two decimals.
fn load_percent(raw: u32) -> f64 {
    round2(raw as f64 / 255.0 * 100.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn capture_u64(re: &Regex, text: &str) -> Option<u64> {
    re.captures(text).and_then(|c| c[1].parse().ok())
}
