//! Interface name validation for SNMP discovery.
//!
//! Agents return garbled or synthetic ifDescr entries often enough that the
//! resolver validates every name before trusting it: junk bytes, bare
//! numbers, and non-physical interfaces (null, loopback) are dropped.

/// Name prefixes of non-physical interfaces (compared case-insensitively).
const NON_PHYSICAL_PREFIXES: &[&str] = &["null", "loopback", "lo"];

/// Minimum fraction of printable characters for a name to be trusted.
const MIN_PRINTABLE_RATIO: f64 = 0.7;

/// Returns true when an ifDescr entry names a usable physical interface.
pub fn is_physical_interface_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return false;
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let total = trimmed.chars().count();
    let printable = trimmed
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .count();
    if (printable as f64) < (total as f64) * MIN_PRINTABLE_RATIO {
        return false;
    }

    if !trimmed.chars().any(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    let lower = trimmed.to_ascii_lowercase();
    !NON_PHYSICAL_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}
