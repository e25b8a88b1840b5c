//! Configuration text normalization.
//!
//! Vendors decorate `show running-config` output with volatile banners that
//! change on every capture without the configuration itself changing. The
//! tracker compares normalized text so those lines never count as drift;
//! storage always keeps the raw capture.

use once_cell::sync::Lazy;
use regex::Regex;

// Timestamp banners like "Tue Mar 10 14:02:33.812 UTC".
static DATE_BANNER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(Mon|Tue|Wed|Thu|Fri|Sat|Sun)\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\b")
        .expect("date banner regex")
});

/// Banner fragments that mark a line as capture noise, not configuration.
const NOISE_BANNERS: &[&str] = &[
    "Building configuration",
    "!! IOS XR Configuration",
    "Last configuration change",
    "Current configuration",
];

/// Strips blank lines, timestamp banners, and capture-noise banners.
pub fn normalize_config(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !DATE_BANNER_RE.is_match(line))
        .filter(|line| !NOISE_BANNERS.iter().any(|banner| line.contains(banner)))
        .collect::<Vec<_>>()
        .join("\n")
}
