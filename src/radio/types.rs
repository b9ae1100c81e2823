use crate::radio::error::ModelingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RadioType {
    Lte,
    Nr,
}

impl FromStr for RadioType {
    type Err = ModelingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LTE" | "4G" => Ok(RadioType::Lte),
            "NR" | "5G" => Ok(RadioType::Nr),
            _ => Err(ModelingError::UnknownRadioType(s.to_string())),
        }
    }
}

impl fmt::Display for RadioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioType::Lte => write!(f, "LTE"),
            RadioType::Nr => write!(f, "NR"),
        }
    }
}

/// 3GPP deployment scenario of a city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaType {
    /// Urban macro
    Uma,
    /// Urban micro, street canyon
    Umi,
    /// Rural macro
    Rma,
}

impl FromStr for AreaType {
    type Err = ModelingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UMA" => Ok(AreaType::Uma),
            "UMI" => Ok(AreaType::Umi),
            "RMA" => Ok(AreaType::Rma),
            _ => Err(ModelingError::UnknownAreaType(s.to_string())),
        }
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaType::Uma => write!(f, "UMa"),
            AreaType::Umi => write!(f, "UMi"),
            AreaType::Rma => write!(f, "RMa"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkCondition {
    LineOfSight,
    NonLineOfSight,
}

impl LinkCondition {
    pub fn is_los(&self) -> bool {
        matches!(self, LinkCondition::LineOfSight)
    }
}

/// Geometry of one candidate UE <-> base station link
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkGeometry {
    pub distance_2d: f64,
    pub distance_3d: f64,
    pub frequency_mhz: f64,
    pub bs_height: f64,
    pub ue_height: f64,
}

impl LinkGeometry {
    pub fn new(distance_2d: f64, frequency_mhz: f64, bs_height: f64, ue_height: f64) -> Self {
        let dh = bs_height - ue_height;
        Self {
            distance_2d,
            distance_3d: (distance_2d * distance_2d + dh * dh).sqrt(),
            frequency_mhz,
            bs_height,
            ue_height,
        }
    }

    pub fn frequency_ghz(&self) -> f64 {
        self.frequency_mhz / 1_000.0
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_mhz * 1.0e6
    }
}

/// Path loss split into its deterministic and random parts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathLossSample {
    pub median_db: f64,
    pub shadow_fading_db: f64,
}

impl PathLossSample {
    pub fn total_db(&self) -> f64 {
        self.median_db + self.shadow_fading_db
    }
}

/// Outcome of evaluating one candidate link
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkBudget {
    /// Sampled LoS/NLoS condition; LTE links carry none
    pub condition: Option<LinkCondition>,
    pub path_loss: PathLossSample,
    pub received_power_db: f64,
    /// Linear signal-to-noise ratio
    pub snr: f64,
    /// log2(1 + SNR), bits/s/Hz
    pub spectral_efficiency: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_area_and_radio() {
        assert_eq!("uma".parse::<AreaType>().unwrap(), AreaType::Uma);
        assert_eq!(" RMa ".parse::<AreaType>().unwrap(), AreaType::Rma);
        assert_eq!("5G".parse::<RadioType>().unwrap(), RadioType::Nr);
        assert_eq!("lte".parse::<RadioType>().unwrap(), RadioType::Lte);
    }

    #[test]
    fn test_unknown_area_is_modeling_error() {
        assert_eq!(
            "InH".parse::<AreaType>(),
            Err(ModelingError::UnknownAreaType("InH".to_string()))
        );
        assert!(matches!(
            "GSM".parse::<RadioType>(),
            Err(ModelingError::UnknownRadioType(_))
        ));
    }

    #[test]
    fn test_geometry_3d_distance() {
        let geometry = LinkGeometry::new(40.0, 3_500.0, 31.5, 1.5);
        assert!((geometry.distance_3d - 50.0).abs() < 1e-9);
        assert!((geometry.frequency_ghz() - 3.5).abs() < 1e-12);
    }
}
