//! Shared data model for driftwatch.
//!
//! Every entity the polling engine produces or consumes lives here:
//! device identity and credentials, normalized interface records, point-in-time
//! device snapshots, configuration versions, and alert events. Optional data is
//! modeled as `Option<T>` rather than sentinel strings, and vendor dispatch
//! goes through the closed [`DeviceKind`] enum so an unsupported vendor/OS
//! combination is a compile error, not a runtime surprise.

pub mod config;
pub mod device;
pub mod interface;
pub mod snapshot;

pub use config::{AlertEvent, ConfigVersion, WatchWord};
pub use device::{AccessMethod, DeviceCredential, DeviceKind, UnknownDeviceKind};
pub use interface::{BandwidthDetail, InterfaceRecord, InterfaceStatus, NeighborRecord, PortState};
pub use snapshot::{DeviceSnapshot, DeviceStatus, LAST_UPDATED_FORMAT};
