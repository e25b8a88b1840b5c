//! Configuration drift detection.
//!
//! Three stages, each usable on its own: the tracker versions raw captures
//! through a [`driftwatch_common::ConfigStore`] and decides change against
//! normalized text; the diff engine computes the multiset symmetric
//! difference between the current and latest archived version; the watchword
//! scanner turns diff lines that start with an operator-watched phrase into
//! alert events.

pub mod diff;
pub mod normalize;
pub mod tracker;
pub mod watchword;

pub use diff::{diff, ConfigDiff, ConfigDiffer};
pub use normalize::normalize_config;
pub use tracker::{ConfigTracker, DEFAULT_ARCHIVE_KEEP};
pub use watchword::scan;
