use crate::allocation::BandwidthTiers;
use crate::config::error::{ConfigError, ConfigResult};
use crate::failure::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Physical constants shared by the propagation models.
///
/// Power values are in dB (transmit powers on the channels use the same
/// reference), heights and widths in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioConstants {
    /// Minimum coupling loss, used as the path-loss floor
    pub mcl_db: f64,
    /// LTE antenna height above the rooftops
    pub height_above_buildings_m: f64,
    pub tx_gain_db: f64,
    pub rx_gain_db: f64,
    pub noise_floor_db: f64,
    /// Links received below this power are not viable
    pub minimum_power_db: f64,
    pub ue_height_m: f64,
    pub avg_building_height_m: f64,
    pub avg_street_width_m: f64,
}

impl Default for RadioConstants {
    fn default() -> Self {
        Self {
            mcl_db: 70.0,
            height_above_buildings_m: 20.0,
            tx_gain_db: 15.0,
            rx_gain_db: 0.0,
            noise_floor_db: -100.0,
            minimum_power_db: -80.0,
            ue_height_m: 1.5,
            avg_building_height_m: 10.0,
            avg_street_width_m: 10.0,
        }
    }
}

/// Immutable configuration for one simulation batch.
///
/// A single instance is shared (behind an `Arc`) by every trial of a batch,
/// so concurrent batches may run with different configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Independent population resamples per city
    pub rounds_per_user: u32,
    /// Number of severity levels, starting at 0
    pub severity_rounds: u32,
    /// Reset/fail/reconnect/measure cycles per severity level
    pub rounds_per_severity: u32,
    /// Lower bound (inclusive) of the UE demand window
    pub ue_capacity_min: u32,
    /// Upper bound (exclusive) of the UE demand window
    pub ue_capacity_max: u32,
    /// Fraction of the city population that is active
    pub activity: f64,
    /// Maximum distance for a base-station adjacency edge
    pub bs_bs_range_m: f64,
    /// Stations at or below this functionality are not connection candidates
    pub min_functionality: f64,
    /// Descending per-device bandwidth tiers; the first entry is the channel ceiling
    pub channel_bandwidths: Vec<f64>,
    pub radio: RadioConstants,
    pub failure: FailurePolicy,
    pub parallel_workers: usize,
    /// Confidence level of the reported intervals
    pub confidence: f64,
    /// Base seed; trial `i` is seeded with `seed + i`. Entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds_per_user: 100,
            severity_rounds: 10,
            rounds_per_severity: 2,
            ue_capacity_min: 10,
            ue_capacity_max: 100,
            activity: 0.007,
            bs_bs_range_m: 2_000.0,
            min_functionality: 0.1,
            channel_bandwidths: vec![20.0, 15.0, 10.0, 5.0, 3.0, 1.4],
            radio: RadioConstants::default(),
            failure: FailurePolicy::None,
            parallel_workers: num_cpus::get(),
            confidence: 0.95,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a configuration from a JSON document.
    /// Missing fields take their default values.
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: SimulationConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validated bandwidth tier list
    pub fn tiers(&self) -> ConfigResult<BandwidthTiers> {
        BandwidthTiers::new(self.channel_bandwidths.clone())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.rounds_per_user == 0 {
            return Err(ConfigError::invalid("rounds_per_user", "must be at least 1"));
        }
        if self.severity_rounds == 0 {
            return Err(ConfigError::invalid("severity_rounds", "must be at least 1"));
        }
        if self.rounds_per_severity == 0 {
            return Err(ConfigError::invalid(
                "rounds_per_severity",
                "must be at least 1",
            ));
        }
        if self.ue_capacity_min == 0 || self.ue_capacity_min >= self.ue_capacity_max {
            return Err(ConfigError::invalid(
                "ue_capacity_min",
                format!(
                    "demand window [{}, {}) is empty or starts at zero",
                    self.ue_capacity_min, self.ue_capacity_max
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.activity) {
            return Err(ConfigError::invalid("activity", "must lie in [0, 1]"));
        }
        if self.bs_bs_range_m.is_nan() || self.bs_bs_range_m < 0.0 {
            return Err(ConfigError::invalid("bs_bs_range_m", "must be non-negative"));
        }
        if !(0.0..1.0).contains(&self.min_functionality) {
            return Err(ConfigError::invalid("min_functionality", "must lie in [0, 1)"));
        }
        if self.parallel_workers == 0 {
            return Err(ConfigError::invalid("parallel_workers", "must be at least 1"));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ConfigError::invalid("confidence", "must lie in (0, 1)"));
        }
        if self.radio.ue_height_m <= 0.0 || self.radio.avg_building_height_m <= 0.0 {
            return Err(ConfigError::invalid("radio", "heights must be positive"));
        }
        if self.radio.avg_street_width_m <= 0.0 || self.radio.height_above_buildings_m <= 0.0 {
            return Err(ConfigError::invalid(
                "radio",
                "street width and rooftop clearance must be positive",
            ));
        }

        self.tiers()?;
        self.failure.validate()?;
        Ok(())
    }
}
