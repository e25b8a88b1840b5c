//! SNMP telemetry resolution: discovery, state, and throughput.

use crate::filter::is_physical_interface_name;
use crate::oids;
use crate::pool::SessionPool;
use driftwatch_common::{PollError, PollResult, SnmpTransport};
use driftwatch_types::PortState;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// GETBULK repetition count used for table walks.
const MAX_REPETITIONS: u32 = 25;

/// Result of a two-sample throughput measurement, in Mbps per direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub mbps_in: f64,
    pub mbps_out: f64,
}

/// Resolves interface topology and throughput for one device at a time over
/// the raw [`SnmpTransport`], reusing one pooled session per address.
pub struct SnmpResolver {
    transport: Arc<dyn SnmpTransport>,
    pool: SessionPool,
}

impl SnmpResolver {
    /// Creates a resolver over the given transport.
    pub fn new(transport: Arc<dyn SnmpTransport>) -> Self {
        Self {
            transport,
            pool: SessionPool::new(),
        }
    }

    /// Number of pooled sessions (for diagnostics).
    pub fn pooled_sessions(&self) -> usize {
        self.pool.len()
    }

    /// Discovers usable interfaces as a `{name -> ifIndex}` map.
    ///
    /// One GETBULK on ifDescr; varbinds are consumed only while their OID
    /// keeps the ifDescr prefix, and every name passes the physical-name
    /// filter before entering the map. An empty surviving map is a resolver
    /// failure — a device with no usable interfaces cannot be polled.
    pub async fn interface_indexes(
        &self,
        address: &str,
        community: &str,
    ) -> PollResult<HashMap<String, u32>> {
        let session = self.pool.session(address, community);
        let _guard = session.lock().await;

        let varbinds = self
            .transport
            .get_bulk(address, community, oids::IF_DESCR, MAX_REPETITIONS)
            .await
            .ok_or_else(|| PollError::protocol(address, "ifDescr walk failed"))?;

        let prefix = format!("{}.", oids::IF_DESCR);
        let mut indexes = HashMap::new();
        for (oid, value) in varbinds {
            // The agent fills the bulk response past the end of the table;
            // the first out-of-prefix OID ends the walk.
            let Some(suffix) = oid.strip_prefix(&prefix) else {
                break;
            };
            let Ok(if_index) = suffix.parse::<u32>() else {
                break;
            };

            let Some(name) = value.as_str() else {
                continue;
            };
            if is_physical_interface_name(name) {
                indexes.insert(name.trim().to_string(), if_index);
            } else {
                debug!(address, name, "dropping non-physical interface entry");
            }
        }

        if indexes.is_empty() {
            return Err(PollError::protocol(address, "no usable interfaces found"));
        }
        Ok(indexes)
    }

    /// Maps interface indexes to their assigned IP addresses.
    ///
    /// Walks ipAdEntIfIndex; the address is the last four components of each
    /// returned OID, not the value — agents have been seen returning
    /// malformed values in this column.
    pub async fn address_map(
        &self,
        address: &str,
        community: &str,
    ) -> PollResult<HashMap<u32, String>> {
        let session = self.pool.session(address, community);
        let _guard = session.lock().await;

        let varbinds = self
            .transport
            .get_bulk(address, community, oids::IP_AD_ENT_IF_INDEX, MAX_REPETITIONS)
            .await
            .ok_or_else(|| PollError::protocol(address, "ipAdEntIfIndex walk failed"))?;

        let prefix = format!("{}.", oids::IP_AD_ENT_IF_INDEX);
        let mut map = HashMap::new();
        for (oid, value) in varbinds {
            let Some(suffix) = oid.strip_prefix(&prefix) else {
                break;
            };
            let octets: Vec<&str> = suffix.split('.').collect();
            if octets.len() != 4 {
                break;
            }
            let Some(if_index) = value.as_u64() else {
                continue;
            };
            map.insert(if_index as u32, octets.join("."));
        }
        Ok(map)
    }

    /// Fetches the administrative and operational state of one interface.
    ///
    /// Never fails: an unreachable agent or out-of-range code maps to
    /// [`PortState::Unknown`].
    pub async fn port_state(
        &self,
        address: &str,
        community: &str,
        if_index: u32,
    ) -> (PortState, PortState) {
        let admin = self
            .get_state(address, community, oids::IF_ADMIN_STATUS, if_index)
            .await;
        let oper = self
            .get_state(address, community, oids::IF_OPER_STATUS, if_index)
            .await;
        (admin, oper)
    }

    async fn get_state(
        &self,
        address: &str,
        community: &str,
        column: &str,
        if_index: u32,
    ) -> PortState {
        match self
            .transport
            .get(address, community, &oids::instance(column, if_index))
            .await
            .and_then(|v| v.as_i64())
        {
            Some(code) => PortState::from_code(code),
            None => PortState::Unknown,
        }
    }

    /// Fetches the maximum link speed in Mbps (ifHighSpeed), if available.
    pub async fn max_speed(&self, address: &str, community: &str, if_index: u32) -> Option<u64> {
        self.transport
            .get(address, community, &oids::instance(oids::IF_HIGH_SPEED, if_index))
            .await
            .and_then(|v| v.as_u64())
    }

    /// Measures instantaneous throughput from two time-separated samples of
    /// the 64-bit octet counters.
    ///
    /// A counter that went backwards between samples (agent restart or wrap)
    /// surfaces as [`PollError::CounterWrap`] so the caller keeps the
    /// previous figure instead of recording a negative rate.
    pub async fn throughput(
        &self,
        address: &str,
        community: &str,
        if_index: u32,
        interval: Duration,
    ) -> PollResult<Throughput> {
        let session = self.pool.session(address, community);
        let _guard = session.lock().await;

        let (in1, out1) = self.octet_counters(address, community, if_index).await?;
        tokio::time::sleep(interval).await;
        let (in2, out2) = self.octet_counters(address, community, if_index).await?;

        if in2 < in1 || out2 < out1 {
            warn!(address, if_index, "octet counter went backwards between samples");
            return Err(PollError::CounterWrap {
                address: address.to_string(),
                if_index,
            });
        }

        let secs = interval.as_secs_f64();
        Ok(Throughput {
            mbps_in: (in2 - in1) as f64 * 8.0 / 1_000_000.0 / secs,
            mbps_out: (out2 - out1) as f64 * 8.0 / 1_000_000.0 / secs,
        })
    }

    async fn octet_counters(
        &self,
        address: &str,
        community: &str,
        if_index: u32,
    ) -> PollResult<(u64, u64)> {
        let input = self
            .transport
            .get(address, community, &oids::instance(oids::IF_HC_IN_OCTETS, if_index))
            .await
            .and_then(|v| v.as_u64())
            .ok_or_else(|| PollError::protocol(address, "ifHCInOctets fetch failed"))?;
        let output = self
            .transport
            .get(address, community, &oids::instance(oids::IF_HC_OUT_OCTETS, if_index))
            .await
            .and_then(|v| v.as_u64())
            .ok_or_else(|| PollError::protocol(address, "ifHCOutOctets fetch failed"))?;
        Ok((input, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use driftwatch_common::SnmpValue;
    use std::sync::Mutex;

    /// Transport fake: canned GET responses keyed by OID, plus one canned
    /// bulk response. GET responses for counter OIDs pop from a queue so a
    /// two-sample measurement sees two different readings.
    #[derive(Default)]
    struct FakeTransport {
        gets: Mutex<HashMap<String, Vec<SnmpValue>>>,
        bulk: Vec<(String, SnmpValue)>,
    }

    impl FakeTransport {
        fn queue_get(&self, oid: &str, values: Vec<SnmpValue>) {
            self.gets.lock().unwrap().insert(oid.to_string(), values);
        }
    }

    #[async_trait]
    impl SnmpTransport for FakeTransport {
        async fn get(&self, _address: &str, _community: &str, oid: &str) -> Option<SnmpValue> {
            let mut gets = self.gets.lock().unwrap();
            let queue = gets.get_mut(oid)?;
            if queue.is_empty() {
                None
            } else {
                Some(queue.remove(0))
            }
        }

        async fn get_bulk(
            &self,
            _address: &str,
            _community: &str,
            _oid: &str,
            _max_repetitions: u32,
        ) -> Option<Vec<(String, SnmpValue)>> {
            Some(self.bulk.clone())
        }
    }

    fn descr(if_index: u32, name: &str) -> (String, SnmpValue) {
        (
            format!("{}.{}", oids::IF_DESCR, if_index),
            SnmpValue::OctetString(name.to_string()),
        )
    }

    #[tokio::test]
    async fn test_interface_discovery_filters_and_stops_at_prefix_end() {
        let transport = FakeTransport {
            bulk: vec![
                descr(1, "GigabitEthernet0/0"),
                descr(2, "Null0"),
                descr(3, "Gi0/1"),
                // Out-of-prefix OID: the walk must stop here, even though
                // a valid-looking entry follows.
                (
                    "1.3.6.1.2.1.2.2.1.7.1".to_string(),
                    SnmpValue::Integer(1),
                ),
                descr(9, "Gi0/9"),
            ],
            ..Default::default()
        };
        let resolver = SnmpResolver::new(Arc::new(transport));

        let indexes = resolver
            .interface_indexes("192.0.2.10", "public")
            .await
            .unwrap();
        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes.get("GigabitEthernet0/0"), Some(&1));
        assert_eq!(indexes.get("Gi0/1"), Some(&3));
        assert!(!indexes.contains_key("Gi0/9"));
    }

    #[tokio::test]
    async fn test_interface_discovery_empty_map_is_failure() {
        let transport = FakeTransport {
            bulk: vec![descr(1, "Null0"), descr(2, "Loopback0")],
            ..Default::default()
        };
        let resolver = SnmpResolver::new(Arc::new(transport));

        let err = resolver
            .interface_indexes("192.0.2.10", "public")
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_address_map_reads_ip_from_oid() {
        let transport = FakeTransport {
            bulk: vec![(
                format!("{}.192.0.2.74", oids::IP_AD_ENT_IF_INDEX),
                SnmpValue::Integer(1),
            )],
            ..Default::default()
        };
        let resolver = SnmpResolver::new(Arc::new(transport));

        let map = resolver.address_map("192.0.2.10", "public").await.unwrap();
        assert_eq!(map.get(&1).map(String::as_str), Some("192.0.2.74"));
    }

    #[tokio::test]
    async fn test_port_state_maps_codes_and_misses() {
        let transport = FakeTransport::default();
        transport.queue_get(
            &oids::instance(oids::IF_ADMIN_STATUS, 1),
            vec![SnmpValue::Integer(1)],
        );
        // No oper status queued: fetch misses and maps to Unknown.
        let resolver = SnmpResolver::new(Arc::new(transport));

        let (admin, oper) = resolver.port_state("192.0.2.10", "public", 1).await;
        assert_eq!(admin, PortState::Up);
        assert_eq!(oper, PortState::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throughput_arithmetic() {
        let transport = FakeTransport::default();
        transport.queue_get(
            &oids::instance(oids::IF_HC_IN_OCTETS, 1),
            vec![SnmpValue::Counter64(1000), SnmpValue::Counter64(9000)],
        );
        transport.queue_get(
            &oids::instance(oids::IF_HC_OUT_OCTETS, 1),
            vec![SnmpValue::Counter64(500), SnmpValue::Counter64(4500)],
        );
        let resolver = SnmpResolver::new(Arc::new(transport));

        let tp = resolver
            .throughput("192.0.2.10", "public", 1, Duration::from_secs(1))
            .await
            .unwrap();
        assert!((tp.mbps_in - 0.064).abs() < 1e-9);
        assert!((tp.mbps_out - 0.032).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throughput_counter_wrap_is_distinct_error() {
        let transport = FakeTransport::default();
        transport.queue_get(
            &oids::instance(oids::IF_HC_IN_OCTETS, 1),
            vec![SnmpValue::Counter64(9000), SnmpValue::Counter64(100)],
        );
        transport.queue_get(
            &oids::instance(oids::IF_HC_OUT_OCTETS, 1),
            vec![SnmpValue::Counter64(500), SnmpValue::Counter64(600)],
        );
        let resolver = SnmpResolver::new(Arc::new(transport));

        let err = resolver
            .throughput("192.0.2.10", "public", 1, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PollError::CounterWrap {
                address: "192.0.2.10".to_string(),
                if_index: 1
            }
        );
    }

    #[tokio::test]
    async fn test_session_pool_reuse_across_calls() {
        let transport = FakeTransport {
            bulk: vec![descr(1, "Gi0/0")],
            ..Default::default()
        };
        let resolver = SnmpResolver::new(Arc::new(transport));

        resolver
            .interface_indexes("192.0.2.10", "public")
            .await
            .unwrap();
        resolver
            .interface_indexes("192.0.2.10", "public")
            .await
            .unwrap();
        assert_eq!(resolver.pooled_sessions(), 1);
    }
}
