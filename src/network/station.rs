use crate::allocation::Channel;
use crate::network::geo::GeoPoint;
use crate::network::types::{StationId, UserId, DEFAULT_STATION_RANGE_M};
use crate::radio::RadioType;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A user attached to a base station and the bandwidth tier it asked for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectedUser {
    pub user: UserId,
    pub bandwidth_needed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseStation {
    pub id: StationId,
    pub position: GeoPoint,
    pub height_m: f64,
    pub radio: RadioType,
    pub range_m: f64,
    functionality: f64,
    channels: Vec<Channel>,
    connected: Vec<ConnectedUser>,
    neighbours: Vec<StationId>,
}

impl BaseStation {
    pub fn new(id: StationId, position: GeoPoint, height_m: f64, radio: RadioType) -> Self {
        Self {
            id,
            position,
            height_m,
            radio,
            range_m: DEFAULT_STATION_RANGE_M,
            functionality: 1.0,
            channels: Vec::new(),
            connected: Vec::new(),
            neighbours: Vec::new(),
        }
    }

    pub fn with_range(mut self, range_m: f64) -> Self {
        self.range_m = range_m;
        self
    }

    /// Add an omnidirectional channel. A second channel on an existing
    /// frequency is ignored; returns whether the channel was added.
    pub fn add_channel(&mut self, frequency_mhz: f64, tx_power_db: f64) -> bool {
        if self.channels.iter().any(|c| c.frequency_mhz == frequency_mhz) {
            return false;
        }
        self.channels.push(Channel::new(frequency_mhz, tx_power_db));
        true
    }

    pub fn functionality(&self) -> f64 {
        self.functionality
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [Channel] {
        &mut self.channels
    }

    pub fn connected(&self) -> &[ConnectedUser] {
        &self.connected
    }

    pub(crate) fn connected_mut(&mut self) -> &mut Vec<ConnectedUser> {
        &mut self.connected
    }

    pub fn connected_count(&self) -> usize {
        self.connected.len()
    }

    pub fn neighbours(&self) -> &[StationId] {
        &self.neighbours
    }

    pub(crate) fn add_neighbour(&mut self, other: StationId) {
        if !self.neighbours.contains(&other) {
            self.neighbours.push(other);
        }
    }

    pub(crate) fn clear_neighbours(&mut self) {
        self.neighbours.clear();
    }

    /// Restore full functionality: every channel enabled and empty, no
    /// connected users. Adjacency is kept.
    pub fn reset(&mut self) {
        self.functionality = 1.0;
        for channel in &mut self.channels {
            channel.clear();
            channel.enabled = true;
        }
        self.connected.clear();
    }

    /// Degrade the station. Every channel is emptied and independently
    /// disabled with probability `1 - functionality`.
    pub fn malfunction<R: Rng + ?Sized>(&mut self, functionality: f64, rng: &mut R) {
        self.functionality = functionality.clamp(0.0, 1.0);
        let disable_probability = 1.0 - self.functionality;
        for channel in &mut self.channels {
            channel.clear();
            channel.enabled = rng.gen::<f64>() >= disable_probability;
        }
        self.connected.clear();
    }

    pub fn enabled_channel_count(&self) -> usize {
        self.channels.iter().filter(|c| c.enabled).count()
    }

    pub fn has_enabled_channel(&self) -> bool {
        self.channels.iter().any(|c| c.enabled)
    }

    /// Carrier used to evaluate new links: the first enabled channel
    pub fn reference_channel(&self) -> Option<&Channel> {
        self.channels.iter().find(|c| c.enabled)
    }

    /// Whether users may try to connect to this station at all
    pub fn accepts_connections(&self, min_functionality: f64) -> bool {
        self.functionality > min_functionality && self.has_enabled_channel()
    }

    /// Bandwidth currently allocated to a user, zero when it holds none
    pub fn allocated_bandwidth(&self, user: UserId) -> f64 {
        self.channels
            .iter()
            .find_map(|c| c.allocation(user))
            .unwrap_or(0.0)
    }

    /// A station overflows when any connected user is starved
    pub fn is_overflowing(&self) -> bool {
        self.connected
            .iter()
            .any(|c| self.allocated_bandwidth(c.user) == 0.0)
    }
}
