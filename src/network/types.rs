use crate::network::geo::BoundingBox;
use crate::radio::AreaType;
use serde::{Deserialize, Serialize};

/// Index of a base station in the station arena
pub type StationId = usize;

/// Index of a user equipment in the user arena
pub type UserId = usize;

/// Coverage range assumed when a station directory carries none. The urban
/// NR models are not defined beyond 5 km.
pub const DEFAULT_STATION_RANGE_M: f64 = 5_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub bounds: BoundingBox,
    pub population: u64,
    pub area: AreaType,
}

impl City {
    pub fn new(name: impl Into<String>, bounds: BoundingBox, population: u64, area: AreaType) -> Self {
        Self {
            name: name.into(),
            bounds,
            population,
            area,
        }
    }

    /// Number of simultaneously active users for an activity ratio
    pub fn active_users(&self, activity: f64) -> usize {
        (activity * self.population as f64).floor() as usize
    }
}
