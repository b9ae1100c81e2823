use crate::failure::types::{FailurePolicy, FailureReport};
use crate::network::{BoundingBox, NetworkState};
use rand::seq::index;
use rand::RngCore;
use tracing::{debug, trace};

/// Applies the active failure policy to a freshly reset network
#[derive(Debug, Clone)]
pub struct FailureInjector {
    policy: FailurePolicy,
    bounds: BoundingBox,
    baseline_reported: bool,
}

impl FailureInjector {
    pub fn new(policy: FailurePolicy, bounds: BoundingBox) -> Self {
        Self {
            policy,
            bounds,
            baseline_reported: false,
        }
    }

    /// One-time adjustments made when a trial takes its copy of the
    /// stations, before any severity round
    pub fn prepare(&self, state: &mut NetworkState) {
        if let FailurePolicy::EnvironmentalRisk { range_factor, .. } = self.policy {
            for station in &mut state.stations {
                station.range_m *= range_factor;
            }
            debug!(range_factor, "Scaled station ranges for environmental risk");
        }
    }

    /// Linear received-power factor for new links at `severity`
    pub fn signal_factor(&self, severity: u32) -> f64 {
        match self.policy {
            FailurePolicy::EnvironmentalRisk {
                signal_reduction_per_severity,
                ..
            } => (1.0 - signal_reduction_per_severity * f64::from(severity)).clamp(0.0, 1.0),
            _ => 1.0,
        }
    }

    /// Degrade the network for one round at `severity`
    pub fn inject(
        &mut self,
        state: &mut NetworkState,
        severity: u32,
        rng: &mut dyn RngCore,
    ) -> FailureReport {
        let mut report = FailureReport {
            severity,
            signal_factor: self.signal_factor(severity),
            ..FailureReport::default()
        };

        match self.policy {
            FailurePolicy::None => {
                if severity == 0 && !self.baseline_reported {
                    debug!("No failure policy active, measuring baseline");
                    self.baseline_reported = true;
                }
            }

            FailurePolicy::LargeDisaster {
                radius_per_severity,
                power_outage,
            } => {
                let radius = radius_per_severity * f64::from(severity);
                let epicenter = self.bounds.sample(rng);
                for station in &mut state.stations {
                    let distance = station.position.distance_to(&epicenter);
                    if distance < radius {
                        let functionality = if power_outage {
                            0.0
                        } else {
                            (distance / radius).powi(2)
                        };
                        station.malfunction(functionality, rng);
                        report.affected_stations += 1;
                    }
                }
                report.epicenter = Some(epicenter);
                report.radius_m = Some(radius);
            }

            FailurePolicy::MaliciousAttack {
                fraction,
                decrease_per_severity,
            } => {
                let total = state.stations.len();
                let count = ((total as f64 * fraction).round() as usize).min(total);
                let functionality =
                    (1.0 - decrease_per_severity * f64::from(severity)).clamp(0.0, 1.0);
                for idx in index::sample(rng, total, count).into_iter() {
                    state.stations[idx].malfunction(functionality, rng);
                }
                report.affected_stations = count;
            }

            FailurePolicy::IncreasingDemand {
                offset,
                data_per_severity,
                window_size,
            } => {
                let low = offset.saturating_add(data_per_severity.saturating_mul(severity));
                let high = low.saturating_add(window_size);
                state.redraw_demands(low, high, rng);
                report.demand_window = Some((low, high));
            }

            FailurePolicy::EnvironmentalRisk { .. } => {}
        }

        trace!(
            severity,
            policy = self.policy.name(),
            affected = report.affected_stations,
            "Injected failure"
        );
        report
    }
}
