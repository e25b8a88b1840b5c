//! Configuration versions, watchwords, and alert events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One captured device configuration.
///
/// The stored text is always the raw capture; normalization happens only at
/// comparison time. At most one version is current per `unique_id`;
/// superseded versions move verbatim to the archive with their original
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigVersion {
    /// Stable device identity (hardware address).
    pub unique_id: String,
    /// Raw configuration text as captured.
    pub configuration: String,
    /// When this version was captured.
    pub captured_at: DateTime<Utc>,
}

impl ConfigVersion {
    /// Creates a version record.
    pub fn new(
        unique_id: impl Into<String>,
        configuration: impl Into<String>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            configuration: configuration.into(),
            captured_at,
        }
    }
}

/// Operator-maintained watched configuration keyword.
///
/// Matched as a line-start token against diff output, never as a substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchWord {
    /// Stable identifier assigned by the operator store.
    pub id: u64,
    /// The watched word or phrase.
    pub word: String,
}

impl WatchWord {
    /// Creates a watchword.
    pub fn new(id: u64, word: impl Into<String>) -> Self {
        Self {
            id,
            word: word.into(),
        }
    }
}

/// Ephemeral alert message delivered to all connected subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Human-readable description of what changed.
    pub description: String,
}

impl AlertEvent {
    /// Creates an alert event.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Standard event for a watched configuration item found in a diff.
    pub fn watchword_changed(word: &str, unique_id: &str) -> Self {
        Self::new(format!(
            "watched configuration item '{word}' changed on device {unique_id}"
        ))
    }
}
