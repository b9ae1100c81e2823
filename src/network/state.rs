use crate::config::SimulationConfig;
use crate::network::station::BaseStation;
use crate::network::types::{City, StationId, UserId};
use crate::network::user::UserEquipment;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Arena holding every base station and user of one trial.
///
/// Stations and users are addressed by their index; ids are rewritten on
/// construction so that `stations[i].id == i` always holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkState {
    pub stations: Vec<BaseStation>,
    pub users: Vec<UserEquipment>,
}

impl NetworkState {
    pub fn new(mut stations: Vec<BaseStation>) -> Self {
        for (idx, station) in stations.iter_mut().enumerate() {
            station.id = idx;
        }
        Self {
            stations,
            users: Vec::new(),
        }
    }

    pub fn station(&self, id: StationId) -> Option<&BaseStation> {
        self.stations.get(id)
    }

    pub fn station_mut(&mut self, id: StationId) -> Option<&mut BaseStation> {
        self.stations.get_mut(id)
    }

    pub fn user(&self, id: UserId) -> Option<&UserEquipment> {
        self.users.get(id)
    }

    pub fn add_user(&mut self, mut user: UserEquipment) -> UserId {
        let id = self.users.len();
        user.id = id;
        self.users.push(user);
        id
    }

    /// Replace the population with `city.active_users(activity)` users placed
    /// uniformly in the bounding box.
    pub fn populate_users<R: Rng + ?Sized>(
        &mut self,
        city: &City,
        config: &SimulationConfig,
        rng: &mut R,
    ) {
        let count = city.active_users(config.activity);
        self.users.clear();
        self.users.reserve(count);
        for id in 0..count {
            let position = city.bounds.sample(rng);
            let demand = draw_demand(config.ue_capacity_min, config.ue_capacity_max, rng);
            self.users.push(UserEquipment::new(id, position, demand));
        }
    }

    /// Give every user a new demand drawn uniformly from `[low, high)`
    pub fn redraw_demands<R: Rng + ?Sized>(&mut self, low: u32, high: u32, rng: &mut R) {
        for user in &mut self.users {
            user.requested_capacity = draw_demand(low, high, rng);
        }
    }

    /// Drop every link and restore every station to full functionality
    pub fn reset_all(&mut self) {
        for station in &mut self.stations {
            station.reset();
        }
        for user in &mut self.users {
            user.reset();
        }
    }
}

fn draw_demand<R: Rng + ?Sized>(low: u32, high: u32, rng: &mut R) -> f64 {
    if high > low {
        f64::from(rng.gen_range(low..high))
    } else {
        f64::from(low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::geo::{BoundingBox, GeoPoint};
    use crate::radio::{AreaType, RadioType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn city() -> City {
        City::new(
            "Testville",
            BoundingBox::new(52.0, 5.0, 52.05, 5.05),
            10_000,
            AreaType::Umi,
        )
    }

    #[test]
    fn test_station_ids_follow_index() {
        let stations = vec![
            BaseStation::new(42, GeoPoint::new(5.0, 52.0), 25.0, RadioType::Lte),
            BaseStation::new(42, GeoPoint::new(5.01, 52.0), 25.0, RadioType::Nr),
        ];
        let state = NetworkState::new(stations);
        assert_eq!(state.stations[0].id, 0);
        assert_eq!(state.stations[1].id, 1);
        assert!(state.station(2).is_none());
    }

    #[test]
    fn test_populate_users_within_bounds_and_window() {
        let mut state = NetworkState::default();
        let config = SimulationConfig {
            activity: 0.01,
            ..SimulationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        state.populate_users(&city(), &config, &mut rng);

        assert_eq!(state.users.len(), 100);
        for (idx, user) in state.users.iter().enumerate() {
            assert_eq!(user.id, idx);
            assert!(city().bounds.contains(&user.position));
            assert!(user.requested_capacity >= 10.0 && user.requested_capacity < 100.0);
            assert_eq!(user.requested_capacity.fract(), 0.0);
            assert!(user.is_isolated());
        }
    }

    #[test]
    fn test_redraw_demands_moves_window() {
        let mut state = NetworkState::default();
        let config = SimulationConfig {
            activity: 0.01,
            ..SimulationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        state.populate_users(&city(), &config, &mut rng);
        state.redraw_demands(200, 210, &mut rng);
        assert!(state
            .users
            .iter()
            .all(|u| (200.0..210.0).contains(&u.requested_capacity)));
    }
}
