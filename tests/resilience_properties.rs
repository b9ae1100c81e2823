//! Behavioural properties of the simulation core
//!
//! Run with: cargo test --test resilience_properties -- --nocapture

#[path = "fixtures/mod.rs"]
mod fixtures;

use fixtures::{lte_station, nr_station, small_city};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use resilsim::allocation::{connect_users, BandwidthTiers, CapacityAllocator, ConnectionContext};
use resilsim::config::RadioConstants;
use resilsim::metrics::{measure, MetricKind, MetricSample, Metrics};
use resilsim::network::{BaseStation, GeoPoint, NetworkState, UserEquipment};
use resilsim::radio::{AreaType, PropagationModel, RadioType};
use resilsim::topology::{build_adjacency, TopologyAnalyzer};

fn single_channel_station() -> BaseStation {
    let mut bs = BaseStation::new(0, GeoPoint::new(5.0, 52.0), 30.0, RadioType::Lte);
    bs.add_channel(1_800.0, 43.0);
    bs
}

#[test]
fn test_three_equal_requests_on_one_channel() {
    println!("\n=== Allocator: 10 + 10 + 10 on a ceiling of 20 ===\n");

    let allocator = CapacityAllocator::new(BandwidthTiers::default());
    let mut bs = single_channel_station();

    allocator.admit(&mut bs, 0, 10.0).unwrap();
    allocator.admit(&mut bs, 1, 10.0).unwrap();
    assert_eq!(bs.allocated_bandwidth(0), 10.0);
    assert_eq!(bs.allocated_bandwidth(1), 10.0);
    println!("✓ First two devices hold 10 each (at ceiling)");

    allocator.admit(&mut bs, 2, 10.0).unwrap();
    let allocations: Vec<f64> = (0..3).map(|u| bs.allocated_bandwidth(u)).collect();
    println!("✓ After third device: {:?}", allocations);

    assert_eq!(allocations, vec![5.0, 5.0, 10.0]);
    assert!(bs.channels()[0].total_allocated() <= 20.0);
    assert!(!bs.is_overflowing());
}

#[test]
fn test_single_demotion_when_one_step_suffices() {
    let allocator = CapacityAllocator::default();
    let mut bs = single_channel_station();
    allocator.admit(&mut bs, 0, 10.0).unwrap();
    allocator.admit(&mut bs, 1, 10.0).unwrap();

    allocator.admit(&mut bs, 2, 3.0).unwrap();
    assert_eq!(bs.allocated_bandwidth(0), 5.0);
    assert_eq!(bs.allocated_bandwidth(1), 10.0);
    assert_eq!(bs.allocated_bandwidth(2), 3.0);
}

#[test]
fn test_capacity_invariant_under_random_load() {
    let tiers = BandwidthTiers::default();
    let allocator = CapacityAllocator::new(tiers.clone());
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..100 {
        let mut bs = lte_station(5.0, 52.0);
        for user in 0..rng.gen_range(1..40) {
            let need = tiers.as_slice()[rng.gen_range(0..tiers.as_slice().len())];
            allocator.admit(&mut bs, user, need).unwrap();
            if rng.gen_bool(0.2) {
                allocator.release(&mut bs, user / 2).unwrap();
            }
            if rng.gen_bool(0.1) {
                allocator.repack(&mut bs).unwrap();
            }
            for channel in bs.channels() {
                assert!(channel.total_allocated() <= tiers.ceiling() + 1e-9);
            }
        }
    }
}

fn connect(state: &mut NetworkState, seed: u64) {
    let propagation = PropagationModel::new(RadioConstants::default());
    let allocator = CapacityAllocator::default();
    let ctx = ConnectionContext {
        area: AreaType::Uma,
        propagation: &propagation,
        allocator: &allocator,
        min_functionality: 0.1,
        signal_factor: 1.0,
    };
    let mut rng = StdRng::seed_from_u64(seed);
    connect_users(state, &ctx, &mut rng).unwrap();
}

#[test]
fn test_everyone_isolated_without_reachable_stations() {
    let mut rng = StdRng::seed_from_u64(1);

    // Only station is far outside the city
    let mut state = NetworkState::new(vec![lte_station(7.0, 53.0)]);
    state.populate_users(
        &small_city(20_000),
        &resilsim::config::SimulationConfig::default(),
        &mut rng,
    );
    assert!(!state.users.is_empty());
    connect(&mut state, 2);

    let sample = measure(&state, 1);
    assert_eq!(sample.get(MetricKind::IsolatedUsers), Some(1.0));
    assert_eq!(sample.get(MetricKind::Satisfaction), Some(0.0));
    assert_eq!(sample.get(MetricKind::AvgDistance), None);
    println!("✓ No reachable station: every user isolated");
}

#[test]
fn test_nobody_isolated_with_uncongested_coverage() {
    let mut state = NetworkState::new(vec![lte_station(5.0, 52.0)]);
    for k in 0..5 {
        let position = GeoPoint::new(5.0 + 0.0005 * k as f64, 52.0005);
        state.add_user(UserEquipment::new(0, position, 10.0));
    }
    connect(&mut state, 3);

    let sample = measure(&state, 1);
    assert_eq!(sample.get(MetricKind::IsolatedUsers), Some(0.0));
    assert_eq!(sample.get(MetricKind::Satisfaction), Some(1.0));
    assert_eq!(sample.get(MetricKind::ConnectedPerStation), Some(5.0));
    println!("✓ Uncongested coverage: no user isolated");
}

#[test]
fn test_isolated_system_counts() {
    // Far apart: no edges
    let mut state = NetworkState::new(
        (0..4)
            .map(|i| lte_station(5.0 + 0.5 * i as f64, 52.0))
            .collect(),
    );
    build_adjacency(&mut state.stations, 2_000.0);
    assert_eq!(TopologyAnalyzer::new(&state.stations).isolated_systems(), 4);

    // Pairwise close: one system
    let mut state = NetworkState::new(
        (0..4)
            .map(|i| nr_station(5.0 + 0.001 * i as f64, 52.0))
            .collect(),
    );
    build_adjacency(&mut state.stations, 2_000.0);
    assert_eq!(TopologyAnalyzer::new(&state.stations).isolated_systems(), 1);
}

#[test]
fn test_confidence_interval_degeneracy() {
    let empty = Metrics::new();
    let summary = empty.summary(0.95);
    assert!(summary.mean(MetricKind::Satisfaction).is_none());
    assert_eq!(summary.get(MetricKind::Satisfaction).unwrap().half_width, 0.0);

    let mut single = Metrics::new();
    single.add(MetricSample::default().with(MetricKind::Satisfaction, 0.8));
    let entry = *single.summary(0.95).get(MetricKind::Satisfaction).unwrap();
    assert_eq!(entry.mean, Some(0.8));
    assert_eq!(entry.half_width, 0.0);
    assert_eq!(entry.observations, 1);
}

#[test]
fn test_reset_is_idempotent() {
    let allocator = CapacityAllocator::default();
    let mut bs = lte_station(5.0, 52.0);
    let mut rng = StdRng::seed_from_u64(5);
    bs.malfunction(0.3, &mut rng);
    bs.reset();
    allocator.admit(&mut bs, 0, 10.0).unwrap();
    allocator.admit(&mut bs, 1, 5.0).unwrap();

    bs.reset();
    assert_eq!(bs.functionality(), 1.0);
    assert_eq!(bs.connected_count(), 0);
    assert_eq!(bs.enabled_channel_count(), 3);
    assert!(bs.channels().iter().all(|c| c.device_count() == 0));

    bs.reset();
    assert_eq!(bs.functionality(), 1.0);
    assert_eq!(bs.connected_count(), 0);
}
