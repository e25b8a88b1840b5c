//! Error taxonomy for poll operations.
//!
//! Per-device failures are values the orchestrator consumes, not exceptions:
//! every refresh operation returns [`PollResult`] and the poll loops translate
//! an `Err` into "log, mark inactive, continue with the next device".

use thiserror::Error;

/// Result type alias for poll operations.
pub type PollResult<T> = Result<T, PollError>;

/// Failures a single-device poll can produce.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollError {
    /// A session to the device could not be established.
    #[error("connection to {address} failed")]
    Connection {
        /// Management address of the device.
        address: String,
    },

    /// The device rejected the supplied credentials.
    #[error("authentication rejected by {address}")]
    Auth {
        /// Management address of the device.
        address: String,
    },

    /// The SNMP agent returned an error indication or error status.
    #[error("SNMP protocol failure for {address}: {message}")]
    Protocol {
        /// Management address of the device.
        address: String,
        /// Agent-reported detail.
        message: String,
    },

    /// Vendor output did not match any expected shape.
    #[error("parse failure: {message}")]
    Parse {
        /// What failed to parse.
        message: String,
    },

    /// A persistence operation failed.
    #[error("store operation '{operation}' failed: {message}")]
    Store {
        /// The operation that failed (e.g., "archive_and_replace").
        operation: String,
        /// Backend-reported detail.
        message: String,
    },

    /// A throughput counter went backwards between samples (reset or wrap).
    ///
    /// Surfaced as its own case so callers can keep the previously stored
    /// rate instead of recording a negative one.
    #[error("counter went backwards on {address} ifIndex {if_index}")]
    CounterWrap {
        /// Management address of the device.
        address: String,
        /// SNMP interface index of the affected counter.
        if_index: u32,
    },
}

impl PollError {
    /// Creates a connection failure.
    pub fn connection(address: impl Into<String>) -> Self {
        Self::Connection {
            address: address.into(),
        }
    }

    /// Creates an authentication failure.
    pub fn auth(address: impl Into<String>) -> Self {
        Self::Auth {
            address: address.into(),
        }
    }

    /// Creates an SNMP protocol failure.
    pub fn protocol(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            address: address.into(),
            message: message.into(),
        }
    }

    /// Creates a parse failure.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates a store failure.
    pub fn store(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Returns true when the failure means the device itself was unreachable
    /// or unidentifiable, which flips its snapshot to inactive.
    pub fn marks_inactive(&self) -> bool {
        matches!(
            self,
            PollError::Connection { .. }
                | PollError::Auth { .. }
                | PollError::Protocol { .. }
                | PollError::Parse { .. }
        )
    }
}
