use crate::config::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Descending list of the bandwidth values a channel may hand out.
///
/// The first tier doubles as the channel ceiling: the sum of all allocations
/// on one channel never exceeds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct BandwidthTiers(Vec<f64>);

impl BandwidthTiers {
    pub fn new(tiers: Vec<f64>) -> ConfigResult<Self> {
        if tiers.is_empty() {
            return Err(ConfigError::InvalidTiers("tier list is empty".into()));
        }
        if let Some(bad) = tiers.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
            return Err(ConfigError::InvalidTiers(format!(
                "tier {bad} is not a positive bandwidth"
            )));
        }
        if tiers.windows(2).any(|w| w[0] <= w[1]) {
            return Err(ConfigError::InvalidTiers(format!(
                "tiers {tiers:?} are not strictly descending"
            )));
        }
        Ok(Self(tiers))
    }

    pub fn ceiling(&self) -> f64 {
        self.0[0]
    }

    pub fn lowest(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn contains(&self, bandwidth: f64) -> bool {
        self.0.iter().any(|t| *t == bandwidth)
    }

    /// Tier directly below `bandwidth`, or `None` when it is already at (or
    /// below) the lowest tier
    pub fn next_below(&self, bandwidth: f64) -> Option<f64> {
        self.0.iter().copied().find(|t| *t < bandwidth)
    }

    /// Smallest tier whose rate `tier * spectral_efficiency` covers `demand`;
    /// the ceiling when no tier suffices.
    pub fn required_for(&self, demand: f64, spectral_efficiency: f64) -> f64 {
        self.0
            .iter()
            .rev()
            .copied()
            .find(|t| t * spectral_efficiency >= demand)
            .unwrap_or_else(|| self.ceiling())
    }
}

impl TryFrom<Vec<f64>> for BandwidthTiers {
    type Error = ConfigError;

    fn try_from(tiers: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<BandwidthTiers> for Vec<f64> {
    fn from(tiers: BandwidthTiers) -> Self {
        tiers.0
    }
}

impl Default for BandwidthTiers {
    fn default() -> Self {
        Self(vec![20.0, 15.0, 10.0, 5.0, 3.0, 1.4])
    }
}
