//! Per-device SNMP session registry.
//!
//! One session object exists per device address for the lifetime of the
//! process, created lazily on first use. Each session carries a mutex that
//! serializes SNMP exchanges for its device, so the info-refresh and
//! throughput-refresh loops can safely touch the same device concurrently.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Reusable per-device SNMP session state.
#[derive(Debug)]
pub struct SnmpSession {
    /// Device management address.
    pub address: String,
    /// Community string the session was created with.
    pub community: String,
    exchange_lock: Mutex<()>,
}

impl SnmpSession {
    fn new(address: &str, community: &str) -> Self {
        Self {
            address: address.to_string(),
            community: community.to_string(),
            exchange_lock: Mutex::new(()),
        }
    }

    /// Acquires this device's exchange lock. Held across any multi-query
    /// sequence (walk, two-sample throughput) so sequences never interleave.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.exchange_lock.lock().await
    }
}

/// Registry of per-address sessions.
#[derive(Debug, Default)]
pub struct SessionPool {
    sessions: DashMap<String, Arc<SnmpSession>>,
}

impl SessionPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for an address, creating it on first use.
    pub fn session(&self, address: &str, community: &str) -> Arc<SnmpSession> {
        self.sessions
            .entry(address.to_string())
            .or_insert_with(|| Arc::new(SnmpSession::new(address, community)))
            .clone()
    }

    /// Drops the session for an address, if one exists.
    pub fn evict(&self, address: &str) -> bool {
        self.sessions.remove(address).is_some()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true when no session exists yet.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
