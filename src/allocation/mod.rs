//! Capacity allocation
//!
//! Channels negotiate per-device bandwidth by demoting the largest holder
//! one tier at a time; stations pick the best-utilized enabled channel and
//! roll back admissions that starve a device.

pub mod allocator;
pub mod attach;
pub mod channel;
pub mod error;
pub mod tiers;

pub use allocator::CapacityAllocator;
pub use attach::{candidate_stations, connect_user, connect_users, ConnectionContext, ConnectionStats};
pub use channel::Channel;
pub use error::{AllocationError, AllocationResult};
pub use tiers::BandwidthTiers;
