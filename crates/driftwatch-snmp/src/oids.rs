//! Standard interface-table OIDs the resolver queries.

/// ifDescr — interface name/description column.
pub const IF_DESCR: &str = "1.3.6.1.2.1.2.2.1.2";

/// ifAdminStatus — administrative status column.
pub const IF_ADMIN_STATUS: &str = "1.3.6.1.2.1.2.2.1.7";

/// ifOperStatus — operational status column.
pub const IF_OPER_STATUS: &str = "1.3.6.1.2.1.2.2.1.8";

/// ipAdEntIfIndex — address table mapping assigned IP to interface index.
pub const IP_AD_ENT_IF_INDEX: &str = "1.3.6.1.2.1.4.20.1.2";

/// ifHighSpeed — maximum link speed in Mbps.
pub const IF_HIGH_SPEED: &str = "1.3.6.1.2.1.31.1.1.1.15";

/// ifHCInOctets — 64-bit input octet counter.
pub const IF_HC_IN_OCTETS: &str = "1.3.6.1.2.1.31.1.1.1.6";

/// ifHCOutOctets — 64-bit output octet counter.
pub const IF_HC_OUT_OCTETS: &str = "1.3.6.1.2.1.31.1.1.1.10";

/// Builds the instance OID for a column and interface index.
pub fn instance(column: &str, if_index: u32) -> String {
    format!("{column}.{if_index}")
}
