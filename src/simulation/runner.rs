use crate::config::SimulationConfig;
use crate::metrics::{recorder, Metrics, ResultSink};
use crate::network::{BaseStation, City};
use crate::simulation::error::SimulationResult;
use crate::simulation::pool::TrialPool;
use crate::simulation::trial::Trial;
use crate::simulation::types::{CityReport, SeverityReport};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Drives the Monte-Carlo batches of one configuration
pub struct SimulationRunner {
    config: Arc<SimulationConfig>,
    pool: TrialPool,
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        recorder::init_metrics();
        let pool = TrialPool::new(config.parallel_workers);
        Ok(Self {
            config: Arc::new(config),
            pool,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run `rounds_per_user` independent trials for one city and merge their
    /// per-severity observations
    pub async fn run_city(
        &self,
        city: &City,
        stations: &[BaseStation],
    ) -> SimulationResult<CityReport> {
        let config = &self.config;
        if stations.is_empty() {
            warn!(city = %city.name, "City has no base stations, every user will be isolated");
        }
        info!(
            city = %city.name,
            stations = stations.len(),
            users = city.active_users(config.activity),
            trials = config.rounds_per_user,
            policy = config.failure.name(),
            "Starting city batch"
        );

        let shared_city = Arc::new(city.clone());
        let jobs: Vec<_> = (0..config.rounds_per_user)
            .map(|index| {
                let city = Arc::clone(&shared_city);
                let config = Arc::clone(config);
                let stations = stations.to_vec();
                move || {
                    let timer = recorder::TrialTimer::start(city.name.clone());
                    match Trial::new(index, city, config, stations).run() {
                        Ok(metrics) => {
                            timer.complete();
                            Ok(metrics)
                        }
                        Err(e) => {
                            timer.fail(&e.to_string());
                            Err(e)
                        }
                    }
                }
            })
            .collect();

        let trial_results = self.pool.run(jobs).await?;

        let mut merged = vec![Metrics::new(); config.severity_rounds as usize];
        for trial in trial_results {
            for (acc, metrics) in merged.iter_mut().zip(trial) {
                acc.merge(metrics);
            }
        }

        let severities: Vec<SeverityReport> = (0..config.severity_rounds)
            .zip(merged)
            .map(|(severity, metrics)| SeverityReport {
                severity,
                x_value: config.failure.severity_value(severity),
                summary: metrics.summary(config.confidence),
                metrics,
            })
            .collect();

        info!(city = %city.name, severities = severities.len(), "City batch finished");
        Ok(CityReport {
            run_id: Uuid::new_v4(),
            city: city.name.clone(),
            policy: config.failure.clone(),
            axis_label: config.failure.axis_label().to_string(),
            generated_at: Utc::now(),
            trials: config.rounds_per_user,
            severities,
        })
    }

    /// Run every city in turn and hand each severity report to the sink
    pub async fn run_all(
        &self,
        cities: &[(City, Vec<BaseStation>)],
        sink: &mut dyn ResultSink,
    ) -> SimulationResult<Vec<CityReport>> {
        let mut reports = Vec::with_capacity(cities.len());
        for (city, stations) in cities {
            let report = self.run_city(city, stations).await?;
            for severity in &report.severities {
                sink.accept(&report.city, severity);
            }
            reports.push(report);
        }
        Ok(reports)
    }
}
