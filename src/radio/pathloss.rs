//! Path-loss models
//!
//! One implementation per {radio x area} combination, selected with
//! [`model_for`]. LTE uses a single empirical two-term formula regardless of
//! area; NR follows the 3GPP UMa/UMi/RMa line-of-sight and
//! non-line-of-sight formulas with log-normal shadow fading.

use crate::config::RadioConstants;
use crate::radio::error::{ModelResult, ModelingError};
use crate::radio::types::{AreaType, LinkCondition, LinkGeometry, PathLossSample, RadioType};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, LogNormal};
use std::f64::consts::{LN_10, PI};

const SPEED_OF_LIGHT: f64 = 3.0e8;

/// Below this 2D distance every NR model returns the minimum coupling loss
pub const MIN_MODEL_DISTANCE_M: f64 = 10.0;

pub const URBAN_MAX_DISTANCE_M: f64 = 5_000.0;
pub const RMA_LOS_MAX_DISTANCE_M: f64 = 10_000.0;
pub const RMA_NLOS_MAX_DISTANCE_M: f64 = 5_000.0;

pub trait PathLossModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Deterministic part of the path loss in dB
    fn median_db(
        &self,
        geometry: &LinkGeometry,
        condition: LinkCondition,
        constants: &RadioConstants,
    ) -> ModelResult<f64>;

    /// Random part of the path loss in dB, drawn fresh on every call
    fn fading_db(
        &self,
        geometry: &LinkGeometry,
        condition: LinkCondition,
        rng: &mut dyn RngCore,
    ) -> ModelResult<f64>;

    fn path_loss(
        &self,
        geometry: &LinkGeometry,
        condition: LinkCondition,
        constants: &RadioConstants,
        rng: &mut dyn RngCore,
    ) -> ModelResult<PathLossSample> {
        let median_db = self.median_db(geometry, condition, constants)?;
        let shadow_fading_db = self.fading_db(geometry, condition, rng)?;
        Ok(PathLossSample {
            median_db,
            shadow_fading_db,
        })
    }
}

/// Breakpoint distance `2*pi*h_BS*h_UT*f/c` in meters
pub fn breakpoint_distance(geometry: &LinkGeometry) -> f64 {
    2.0 * PI * geometry.bs_height * geometry.ue_height * geometry.frequency_hz() / SPEED_OF_LIGHT
}

/// Shadow fading in dB.
///
/// The linear power factor is log-normal; its logarithm has a standard
/// deviation of `sigma_db` decibels.
pub fn shadow_fading_db(sigma_db: f64, rng: &mut dyn RngCore) -> ModelResult<f64> {
    let distribution = LogNormal::new(0.0, sigma_db * LN_10 / 10.0)
        .map_err(|e| ModelingError::InvalidInput(format!("shadow fading sigma {sigma_db}: {e}")))?;
    let factor: f64 = distribution.sample(rng);
    Ok(10.0 * factor.log10())
}

/// Empirical LTE macro-cell model
#[derive(Debug, Clone, Copy)]
pub struct LteEmpirical;

impl LteEmpirical {
    /// Upper bound of the uniform log-scale perturbation
    const PERTURBATION_DB: f64 = 3.162_277_660_168_379_5; // sqrt(10)
}

impl PathLossModel for LteEmpirical {
    fn name(&self) -> &'static str {
        "LTE"
    }

    fn median_db(
        &self,
        geometry: &LinkGeometry,
        _condition: LinkCondition,
        constants: &RadioConstants,
    ) -> ModelResult<f64> {
        if geometry.frequency_mhz <= 0.0 {
            return Err(ModelingError::InvalidInput(format!(
                "carrier frequency {} MHz",
                geometry.frequency_mhz
            )));
        }
        let h = constants.height_above_buildings_m;
        let a = -18.0 * h.log10() + 21.0 * geometry.frequency_mhz.log10() + 80.0;
        let b = 40.0 * (1.0 - 4.0e-3 * h);
        let distance_km = geometry.distance_2d.max(1.0) / 1_000.0;
        Ok(a + b * distance_km.log10())
    }

    fn fading_db(
        &self,
        _geometry: &LinkGeometry,
        _condition: LinkCondition,
        rng: &mut dyn RngCore,
    ) -> ModelResult<f64> {
        Ok(Self::PERTURBATION_DB * rng.gen::<f64>())
    }
}

/// Coefficients of the urban LoS formula `a + b*log10(d3) + 20*log10(f)`,
/// with `c` weighting the breakpoint term beyond the breakpoint
#[derive(Debug, Clone, Copy)]
pub struct UrbanLosParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Coefficients of the urban NLoS formula
/// `a + b*log10(d3) + c*log10(f) - d*(h_UT - 1.5)`
#[derive(Debug, Clone, Copy)]
pub struct UrbanNlosParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// NR urban macro / micro model
#[derive(Debug, Clone, Copy)]
pub struct UrbanModel {
    pub name: &'static str,
    pub los: UrbanLosParams,
    pub nlos: UrbanNlosParams,
    pub los_sigma_db: f64,
    pub nlos_sigma_db: f64,
}

pub const URBAN_MACRO: UrbanModel = UrbanModel {
    name: "UMa",
    los: UrbanLosParams {
        a: 28.0,
        b: 22.0,
        c: 9.0,
    },
    nlos: UrbanNlosParams {
        a: 13.54,
        b: 39.08,
        c: 20.0,
        d: 0.6,
    },
    los_sigma_db: 4.0,
    nlos_sigma_db: 6.0,
};

pub const URBAN_MICRO: UrbanModel = UrbanModel {
    name: "UMi",
    los: UrbanLosParams {
        a: 32.4,
        b: 21.0,
        c: 9.5,
    },
    nlos: UrbanNlosParams {
        a: 22.4,
        b: 35.3,
        c: 21.3,
        d: 0.3,
    },
    los_sigma_db: 4.0,
    nlos_sigma_db: 7.82,
};

impl UrbanModel {
    fn los_median(&self, g: &LinkGeometry, constants: &RadioConstants) -> ModelResult<f64> {
        let p = self.los;
        let f = g.frequency_ghz();
        if g.distance_2d < MIN_MODEL_DISTANCE_M {
            return Ok(constants.mcl_db);
        }

        let bp = breakpoint_distance(g);
        if g.distance_2d <= bp {
            Ok(p.a + p.b * g.distance_3d.log10() + 20.0 * f.log10())
        } else if g.distance_2d <= URBAN_MAX_DISTANCE_M {
            let dh = g.bs_height - g.ue_height;
            Ok(p.a + 40.0 * g.distance_3d.log10() + 20.0 * f.log10()
                - p.c * (bp * bp + dh * dh).log10())
        } else {
            Err(ModelingError::DistanceOutOfRange {
                model: self.name,
                distance_m: g.distance_2d,
                limit_m: URBAN_MAX_DISTANCE_M,
            })
        }
    }
}

impl PathLossModel for UrbanModel {
    fn name(&self) -> &'static str {
        self.name
    }

    fn median_db(
        &self,
        geometry: &LinkGeometry,
        condition: LinkCondition,
        constants: &RadioConstants,
    ) -> ModelResult<f64> {
        let los = self.los_median(geometry, constants)?;
        if condition.is_los() || geometry.distance_2d < MIN_MODEL_DISTANCE_M {
            return Ok(los);
        }

        let p = self.nlos;
        let nlos = p.a + p.b * geometry.distance_3d.log10() + p.c * geometry.frequency_ghz().log10()
            - p.d * (geometry.ue_height - 1.5);
        Ok(los.max(nlos))
    }

    fn fading_db(
        &self,
        geometry: &LinkGeometry,
        condition: LinkCondition,
        rng: &mut dyn RngCore,
    ) -> ModelResult<f64> {
        if geometry.distance_2d < MIN_MODEL_DISTANCE_M {
            return Ok(0.0);
        }
        let sigma = match condition {
            LinkCondition::LineOfSight => self.los_sigma_db,
            LinkCondition::NonLineOfSight => self.nlos_sigma_db,
        };
        shadow_fading_db(sigma, rng)
    }
}

/// NR rural macro model
#[derive(Debug, Clone, Copy)]
pub struct RuralMacro;

impl RuralMacro {
    fn pl1(distance: f64, building_height: f64, frequency_ghz: f64) -> f64 {
        let hp = building_height.powf(1.72);
        20.0 * (40.0 * PI * distance * frequency_ghz / 3.0).log10()
            + (0.03 * hp).min(10.0) * distance.log10()
            - (0.044 * hp).min(14.77)
            + 0.002 * building_height.log10() * distance
    }

    fn los_median(g: &LinkGeometry, constants: &RadioConstants) -> ModelResult<f64> {
        let h = constants.avg_building_height_m;
        let f = g.frequency_ghz();
        if g.distance_2d < MIN_MODEL_DISTANCE_M {
            return Ok(constants.mcl_db);
        }

        let bp = breakpoint_distance(g);
        if g.distance_2d <= bp {
            Ok(Self::pl1(g.distance_3d, h, f))
        } else if g.distance_2d <= RMA_LOS_MAX_DISTANCE_M {
            Ok(Self::pl1(bp, h, f) + 40.0 * (g.distance_3d / bp).log10())
        } else {
            Err(ModelingError::DistanceOutOfRange {
                model: "RMa LoS",
                distance_m: g.distance_2d,
                limit_m: RMA_LOS_MAX_DISTANCE_M,
            })
        }
    }

    fn nlos_median(g: &LinkGeometry, constants: &RadioConstants) -> ModelResult<f64> {
        if g.distance_2d < MIN_MODEL_DISTANCE_M {
            return Ok(constants.mcl_db);
        }
        if g.distance_2d > RMA_NLOS_MAX_DISTANCE_M {
            return Err(ModelingError::DistanceOutOfRange {
                model: "RMa NLoS",
                distance_m: g.distance_2d,
                limit_m: RMA_NLOS_MAX_DISTANCE_M,
            });
        }

        let w = constants.avg_street_width_m;
        let h = constants.avg_building_height_m;
        let h_bs = g.bs_height;
        let nlos = 161.04 - 7.1 * w.log10() + 7.5 * h.log10()
            - (24.37 - 3.7 * (h / h_bs).powi(2)) * h_bs.log10()
            + (43.42 - 3.1 * h_bs.log10()) * (g.distance_3d.log10() - 3.0)
            + 20.0 * g.frequency_ghz().log10()
            - (3.2 * (11.75 * g.ue_height).log10().powi(2) - 4.97);

        Ok(Self::los_median(g, constants)?.max(nlos))
    }
}

impl PathLossModel for RuralMacro {
    fn name(&self) -> &'static str {
        "RMa"
    }

    fn median_db(
        &self,
        geometry: &LinkGeometry,
        condition: LinkCondition,
        constants: &RadioConstants,
    ) -> ModelResult<f64> {
        match condition {
            LinkCondition::LineOfSight => Self::los_median(geometry, constants),
            LinkCondition::NonLineOfSight => Self::nlos_median(geometry, constants),
        }
    }

    fn fading_db(
        &self,
        geometry: &LinkGeometry,
        condition: LinkCondition,
        rng: &mut dyn RngCore,
    ) -> ModelResult<f64> {
        if geometry.distance_2d < MIN_MODEL_DISTANCE_M {
            return Ok(0.0);
        }
        let sigma = match condition {
            LinkCondition::LineOfSight if geometry.distance_2d <= breakpoint_distance(geometry) => 4.0,
            LinkCondition::LineOfSight => 6.0,
            LinkCondition::NonLineOfSight => 8.0,
        };
        shadow_fading_db(sigma, rng)
    }
}

static LTE_EMPIRICAL: LteEmpirical = LteEmpirical;
static NR_UMA: UrbanModel = URBAN_MACRO;
static NR_UMI: UrbanModel = URBAN_MICRO;
static NR_RMA: RuralMacro = RuralMacro;

/// Path-loss model for a radio type deployed in an area type
pub fn model_for(radio: RadioType, area: AreaType) -> &'static dyn PathLossModel {
    match (radio, area) {
        (RadioType::Lte, _) => &LTE_EMPIRICAL,
        (RadioType::Nr, AreaType::Uma) => &NR_UMA,
        (RadioType::Nr, AreaType::Umi) => &NR_UMI,
        (RadioType::Nr, AreaType::Rma) => &NR_RMA,
    }
}
