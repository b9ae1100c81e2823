use crate::allocation::{connect_users, CapacityAllocator, ConnectionContext};
use crate::config::SimulationConfig;
use crate::failure::FailureInjector;
use crate::metrics::{measure, recorder, MetricKind, Metrics};
use crate::network::{BaseStation, City, NetworkState};
use crate::radio::PropagationModel;
use crate::simulation::error::SimulationResult;
use crate::simulation::types::{PhaseCycle, TrialPhase};
use crate::topology::{build_adjacency, TopologyAnalyzer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::debug;

/// One independent population resample of a city.
///
/// A trial owns its own copy of the stations, so trials never share
/// mutable state.
pub struct Trial {
    index: u32,
    city: Arc<City>,
    config: Arc<SimulationConfig>,
    state: NetworkState,
    cycle: PhaseCycle,
}

impl Trial {
    pub fn new(
        index: u32,
        city: Arc<City>,
        config: Arc<SimulationConfig>,
        stations: Vec<BaseStation>,
    ) -> Self {
        Self {
            index,
            city,
            config,
            state: NetworkState::new(stations),
            cycle: PhaseCycle::new(),
        }
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(u64::from(self.index))),
            None => StdRng::from_entropy(),
        }
    }

    /// Run every severity level. Returns one accumulator per severity.
    pub fn run(mut self) -> SimulationResult<Vec<Metrics>> {
        let config = Arc::clone(&self.config);
        let mut rng = self.rng();

        let allocator = CapacityAllocator::new(config.tiers()?);
        let propagation = PropagationModel::new(config.radio.clone());
        let mut injector = FailureInjector::new(config.failure.clone(), self.city.bounds);

        // Adjacency is built once and kept across failures
        build_adjacency(&mut self.state.stations, config.bs_bs_range_m);
        injector.prepare(&mut self.state);
        self.state.populate_users(&self.city, &config, &mut rng);

        debug!(
            trial = self.index,
            city = %self.city.name,
            stations = self.state.stations.len(),
            users = self.state.users.len(),
            "Trial started"
        );

        let mut results = vec![Metrics::new(); config.severity_rounds as usize];
        for (severity, metrics) in (0..config.severity_rounds).zip(results.iter_mut()) {
            for _ in 0..config.rounds_per_severity {
                self.cycle.transition(TrialPhase::Reset)?;
                self.state.reset_all();

                self.cycle.transition(TrialPhase::InjectFailure)?;
                let report = injector.inject(&mut self.state, severity, &mut rng);

                self.cycle.transition(TrialPhase::Reconnect)?;
                let ctx = ConnectionContext {
                    area: self.city.area,
                    propagation: &propagation,
                    allocator: &allocator,
                    min_functionality: config.min_functionality,
                    signal_factor: report.signal_factor,
                };
                connect_users(&mut self.state, &ctx, &mut rng)?;

                self.cycle.transition(TrialPhase::Measure)?;
                let isolated_systems = TopologyAnalyzer::new(&self.state.stations).isolated_systems();
                let sample = measure(&self.state, isolated_systems);
                recorder::record_round(severity, sample.get(MetricKind::IsolatedUsers));
                metrics.add(sample);
            }
            debug!(
                trial = self.index,
                severity,
                isolated = ?metrics.mean(MetricKind::IsolatedUsers),
                "Severity finished"
            );
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailurePolicy;
    use crate::network::{BoundingBox, GeoPoint};
    use crate::radio::{AreaType, RadioType};

    fn city() -> Arc<City> {
        Arc::new(City::new(
            "Gridtown",
            BoundingBox::new(52.0, 5.0, 52.01, 5.01),
            5_000,
            AreaType::Uma,
        ))
    }

    fn stations() -> Vec<BaseStation> {
        let mut stations = Vec::new();
        for i in 0..3 {
            let mut bs = BaseStation::new(
                0,
                GeoPoint::new(5.0 + 0.005 * i as f64, 52.005),
                30.0,
                RadioType::Lte,
            )
            .with_range(2_000.0);
            bs.add_channel(800.0, 43.0);
            bs.add_channel(1_800.0, 43.0);
            stations.push(bs);
        }
        stations
    }

    fn config(policy: FailurePolicy) -> Arc<SimulationConfig> {
        Arc::new(SimulationConfig {
            severity_rounds: 3,
            rounds_per_severity: 2,
            activity: 0.002,
            failure: policy,
            seed: Some(11),
            ..SimulationConfig::default()
        })
    }

    #[test]
    fn test_trial_produces_one_accumulator_per_severity() {
        let trial = Trial::new(0, city(), config(FailurePolicy::None), stations());
        let results = trial.run().unwrap();
        assert_eq!(results.len(), 3);
        for metrics in &results {
            assert_eq!(metrics.len(), 2);
            // All stations are within ~700 m of each other
            assert_eq!(metrics.mean(MetricKind::IsolatedSystems), Some(1.0));
            assert_eq!(metrics.mean(MetricKind::ActiveStations), Some(3.0));
            assert_eq!(metrics.mean(MetricKind::EnabledChannels), Some(6.0));
        }
    }

    #[test]
    fn test_seeded_trials_are_reproducible() {
        let policy = FailurePolicy::MaliciousAttack {
            fraction: 0.5,
            decrease_per_severity: 0.3,
        };
        let a = Trial::new(4, city(), config(policy.clone()), stations()).run().unwrap();
        let b = Trial::new(4, city(), config(policy), stations()).run().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_power_outage_isolates_everyone() {
        let policy = FailurePolicy::LargeDisaster {
            radius_per_severity: 50_000.0,
            power_outage: true,
        };
        let results = Trial::new(1, city(), config(policy), stations()).run().unwrap();
        assert_eq!(results[2].mean(MetricKind::IsolatedUsers), Some(1.0));
        assert_eq!(results[2].mean(MetricKind::ActiveStations), Some(0.0));
        assert_eq!(results[2].mean(MetricKind::AvgDistance), None);
        // Graph is static: failures never split it
        assert_eq!(results[2].mean(MetricKind::IsolatedSystems), Some(1.0));
    }
}
