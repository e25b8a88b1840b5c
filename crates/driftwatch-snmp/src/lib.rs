//! SNMP Telemetry Resolver.
//!
//! Discovers interface names and indexes, maps assigned addresses, reads
//! admin/oper state and maximum link speed, and measures instantaneous
//! throughput from two time-separated 64-bit counter samples — all through
//! the narrow [`driftwatch_common::SnmpTransport`] contract, with one pooled
//! session per device address.

pub mod filter;
pub mod oids;
pub mod pool;
pub mod resolver;

pub use filter::is_physical_interface_name;
pub use pool::{SessionPool, SnmpSession};
pub use resolver::{SnmpResolver, Throughput};
