use crate::config::{ConfigError, ConfigResult};
use crate::network::GeoPoint;
use serde::{Deserialize, Serialize};

/// The single failure model active in a batch.
///
/// Severity is a round index starting at 0; every policy scales its
/// intensity linearly with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Baseline: stations and demand are left untouched
    #[default]
    None,

    /// Random epicenter, radius growing with severity
    LargeDisaster {
        #[serde(default = "default_radius_per_severity")]
        radius_per_severity: f64,
        /// Stations inside the radius lose all functionality
        #[serde(default)]
        power_outage: bool,
    },

    /// A random fixed share of stations degrades linearly
    MaliciousAttack {
        #[serde(default = "default_fraction")]
        fraction: f64,
        #[serde(default = "default_decrease_per_severity")]
        decrease_per_severity: f64,
    },

    /// Demand window shifts upward with severity
    IncreasingDemand {
        #[serde(default = "default_offset")]
        offset: u32,
        #[serde(default = "default_data_per_severity")]
        data_per_severity: u32,
        #[serde(default = "default_window_size")]
        window_size: u32,
    },

    /// Weather-like attenuation of every new link plus reduced coverage
    EnvironmentalRisk {
        #[serde(default = "default_signal_reduction")]
        signal_reduction_per_severity: f64,
        #[serde(default = "default_range_factor")]
        range_factor: f64,
    },
}

fn default_radius_per_severity() -> f64 {
    1_000.0
}

fn default_fraction() -> f64 {
    0.5
}

fn default_decrease_per_severity() -> f64 {
    0.1
}

fn default_offset() -> u32 {
    10
}

fn default_data_per_severity() -> u32 {
    10
}

fn default_window_size() -> u32 {
    10
}

fn default_signal_reduction() -> f64 {
    0.1
}

fn default_range_factor() -> f64 {
    0.8
}

impl FailurePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            FailurePolicy::None => "none",
            FailurePolicy::LargeDisaster { .. } => "large_disaster",
            FailurePolicy::MaliciousAttack { .. } => "malicious_attack",
            FailurePolicy::IncreasingDemand { .. } => "increasing_demand",
            FailurePolicy::EnvironmentalRisk { .. } => "environmental_risk",
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        match *self {
            FailurePolicy::None => Ok(()),
            FailurePolicy::LargeDisaster {
                radius_per_severity,
                ..
            } => {
                if radius_per_severity.is_finite() && radius_per_severity > 0.0 {
                    Ok(())
                } else {
                    Err(ConfigError::invalid(
                        "failure.radius_per_severity",
                        "must be positive",
                    ))
                }
            }
            FailurePolicy::MaliciousAttack {
                fraction,
                decrease_per_severity,
            } => {
                if !(0.0..=1.0).contains(&fraction) {
                    return Err(ConfigError::invalid("failure.fraction", "must lie in [0, 1]"));
                }
                if decrease_per_severity.is_nan() || decrease_per_severity < 0.0 {
                    return Err(ConfigError::invalid(
                        "failure.decrease_per_severity",
                        "must be non-negative",
                    ));
                }
                Ok(())
            }
            FailurePolicy::IncreasingDemand {
                offset,
                window_size,
                ..
            } => {
                if offset == 0 {
                    return Err(ConfigError::invalid("failure.offset", "must be at least 1"));
                }
                if window_size == 0 {
                    return Err(ConfigError::invalid(
                        "failure.window_size",
                        "must be at least 1",
                    ));
                }
                Ok(())
            }
            FailurePolicy::EnvironmentalRisk {
                signal_reduction_per_severity,
                range_factor,
            } => {
                if signal_reduction_per_severity.is_nan() || signal_reduction_per_severity < 0.0 {
                    return Err(ConfigError::invalid(
                        "failure.signal_reduction_per_severity",
                        "must be non-negative",
                    ));
                }
                if !(range_factor.is_finite() && range_factor > 0.0) {
                    return Err(ConfigError::invalid(
                        "failure.range_factor",
                        "must be positive",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Value plotted on the x-axis for a severity level
    pub fn severity_value(&self, severity: u32) -> f64 {
        let s = f64::from(severity);
        match *self {
            FailurePolicy::None | FailurePolicy::IncreasingDemand { .. } => s,
            FailurePolicy::LargeDisaster {
                radius_per_severity,
                ..
            } => radius_per_severity * s,
            FailurePolicy::MaliciousAttack {
                decrease_per_severity,
                ..
            } => decrease_per_severity * s,
            FailurePolicy::EnvironmentalRisk {
                signal_reduction_per_severity,
                ..
            } => (signal_reduction_per_severity * s * 100.0).min(100.0),
        }
    }

    /// X-axis values for severities `0..rounds`
    pub fn severity_axis(&self, rounds: u32) -> Vec<f64> {
        (0..rounds).map(|s| self.severity_value(s)).collect()
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            FailurePolicy::None => "Severity",
            FailurePolicy::LargeDisaster { .. } => "Radius disaster (meters)",
            FailurePolicy::MaliciousAttack { .. } => "Functionality decreased of BS",
            FailurePolicy::IncreasingDemand { .. } => "Severity level of increasing data",
            FailurePolicy::EnvironmentalRisk { .. } => "Signal strength reduced (%)",
        }
    }
}

/// What one injection changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureReport {
    pub severity: u32,
    /// Stations whose functionality was overridden
    pub affected_stations: usize,
    pub epicenter: Option<GeoPoint>,
    pub radius_m: Option<f64>,
    /// Demand window `[low, high)` drawn from
    pub demand_window: Option<(u32, u32)>,
    /// Linear factor applied to received power of new links
    pub signal_factor: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_defaults() {
        let policy: FailurePolicy = serde_json::from_str(r#"{ "kind": "large_disaster" }"#).unwrap();
        assert_eq!(
            policy,
            FailurePolicy::LargeDisaster {
                radius_per_severity: 1_000.0,
                power_outage: false
            }
        );

        let policy: FailurePolicy =
            serde_json::from_str(r#"{ "kind": "increasing_demand", "window_size": 5 }"#).unwrap();
        assert_eq!(
            policy,
            FailurePolicy::IncreasingDemand {
                offset: 10,
                data_per_severity: 10,
                window_size: 5
            }
        );

        let policy: FailurePolicy = serde_json::from_str(r#"{ "kind": "none" }"#).unwrap();
        assert_eq!(policy, FailurePolicy::None);
    }

    #[test]
    fn test_validation() {
        assert!(FailurePolicy::None.validate().is_ok());
        assert!(FailurePolicy::MaliciousAttack {
            fraction: 1.5,
            decrease_per_severity: 0.1
        }
        .validate()
        .is_err());
        assert!(FailurePolicy::LargeDisaster {
            radius_per_severity: 0.0,
            power_outage: true
        }
        .validate()
        .is_err());
        assert!(FailurePolicy::IncreasingDemand {
            offset: 10,
            data_per_severity: 0,
            window_size: 0
        }
        .validate()
        .is_err());
        assert!(FailurePolicy::EnvironmentalRisk {
            signal_reduction_per_severity: 0.05,
            range_factor: 0.0
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_severity_axis() {
        let policy = FailurePolicy::LargeDisaster {
            radius_per_severity: 1_000.0,
            power_outage: false,
        };
        assert_eq!(policy.severity_axis(3), vec![0.0, 1_000.0, 2_000.0]);
        assert_eq!(policy.axis_label(), "Radius disaster (meters)");

        let policy = FailurePolicy::EnvironmentalRisk {
            signal_reduction_per_severity: 0.25,
            range_factor: 1.0,
        };
        assert_eq!(policy.severity_axis(6), vec![0.0, 25.0, 50.0, 75.0, 100.0, 100.0]);
        assert_eq!(FailurePolicy::None.severity_axis(2), vec![0.0, 1.0]);
    }
}
