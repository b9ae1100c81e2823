//! Network data model
//!
//! Base stations and users live in a [`NetworkState`] arena and refer to each
//! other by integer id. Adjacency between stations is stored as id lists on
//! each station, so the graph holds no ownership cycles.

pub mod geo;
pub mod state;
pub mod station;
pub mod types;
pub mod user;

pub use geo::{BoundingBox, GeoPoint};
pub use state::NetworkState;
pub use station::{BaseStation, ConnectedUser};
pub use types::{City, StationId, UserId, DEFAULT_STATION_RANGE_M};
pub use user::{UeLink, UserEquipment};
