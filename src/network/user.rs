use crate::network::geo::GeoPoint;
use crate::network::types::{StationId, UserId};
use crate::radio::LinkCondition;
use serde::{Deserialize, Serialize};

/// Link between a user and its serving base station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UeLink {
    pub station: StationId,
    pub distance_2d: f64,
    pub distance_3d: f64,
    pub condition: Option<LinkCondition>,
    /// Linear SNR
    pub snr: f64,
    pub spectral_efficiency: f64,
    /// Demand translated into a bandwidth tier
    pub bandwidth_needed: f64,
}

impl UeLink {
    /// Shannon capacity once the station allocated `bandwidth`
    pub fn shannon_capacity(&self, bandwidth: f64) -> f64 {
        bandwidth * self.spectral_efficiency
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEquipment {
    pub id: UserId,
    pub position: GeoPoint,
    /// Demand in the same unit as tier bandwidth x spectral efficiency
    pub requested_capacity: f64,
    pub link: Option<UeLink>,
}

impl UserEquipment {
    pub fn new(id: UserId, position: GeoPoint, requested_capacity: f64) -> Self {
        Self {
            id,
            position,
            requested_capacity,
            link: None,
        }
    }

    pub fn is_isolated(&self) -> bool {
        self.link.is_none()
    }

    pub fn reset(&mut self) {
        self.link = None;
    }
}
