//! Shared builders for integration tests

use resilsim::config::SimulationConfig;
use resilsim::failure::FailurePolicy;
use resilsim::network::{BaseStation, BoundingBox, City, GeoPoint};
use resilsim::radio::{AreaType, RadioType};

/// ~1.4 km x 1.1 km box
pub fn small_city(population: u64) -> City {
    City::new(
        "Testburg",
        BoundingBox::new(52.0, 5.0, 52.01, 5.02),
        population,
        AreaType::Uma,
    )
}

/// LTE station with the three usual carriers
pub fn lte_station(lon: f64, lat: f64) -> BaseStation {
    let mut bs = BaseStation::new(0, GeoPoint::new(lon, lat), 30.0, RadioType::Lte);
    bs.add_channel(800.0, 43.0);
    bs.add_channel(1_800.0, 43.0);
    bs.add_channel(2_600.0, 43.0);
    bs
}

/// NR station with a low-band and a mid-band carrier
pub fn nr_station(lon: f64, lat: f64) -> BaseStation {
    let mut bs = BaseStation::new(0, GeoPoint::new(lon, lat), 25.0, RadioType::Nr);
    bs.add_channel(700.0, 40.0);
    bs.add_channel(3_500.0, 40.0);
    bs
}

/// Mixed 3x3 grid covering `small_city`
#[allow(dead_code)]
pub fn grid_stations() -> Vec<BaseStation> {
    let mut stations = Vec::new();
    for i in 0..3 {
        for j in 0..3 {
            let lon = 5.0 + 0.01 * i as f64;
            let lat = 52.0 + 0.005 * j as f64;
            let bs = if (i + j) % 2 == 0 {
                lte_station(lon, lat)
            } else {
                nr_station(lon, lat)
            };
            stations.push(bs.with_range(2_000.0));
        }
    }
    stations
}

#[allow(dead_code)]
pub fn quick_config(policy: FailurePolicy) -> SimulationConfig {
    SimulationConfig {
        rounds_per_user: 4,
        severity_rounds: 3,
        rounds_per_severity: 2,
        parallel_workers: 2,
        failure: policy,
        seed: Some(2024),
        ..SimulationConfig::default()
    }
}
