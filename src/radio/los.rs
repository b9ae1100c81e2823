//! Line-of-sight probability per area type

use crate::radio::error::{ModelResult, ModelingError};
use crate::radio::types::{AreaType, LinkCondition};
use rand::{Rng, RngCore};

/// UE heights above this are outside the UMi LoS probability model
pub const UMI_MAX_UE_HEIGHT_M: f64 = 23.0;

/// Probability that a link of 2D length `d_2d` is line-of-sight
pub fn los_probability(area: AreaType, d_2d: f64, ue_height: f64) -> ModelResult<f64> {
    let p = match area {
        AreaType::Rma => {
            if d_2d <= 10.0 {
                1.0
            } else {
                (-(d_2d - 10.0) / 1_000.0).exp()
            }
        }
        AreaType::Uma => {
            if d_2d <= 18.0 {
                1.0
            } else {
                18.0 / d_2d + (-d_2d / 36.0).exp() * (1.0 - 18.0 / d_2d)
            }
        }
        AreaType::Umi => {
            if d_2d <= 18.0 {
                1.0
            } else {
                if ue_height > UMI_MAX_UE_HEIGHT_M {
                    return Err(ModelingError::HeightOutOfRange {
                        model: "UMi LoS probability",
                        height_m: ue_height,
                        limit_m: UMI_MAX_UE_HEIGHT_M,
                    });
                }
                let c = if ue_height <= 13.0 {
                    0.0
                } else {
                    ((ue_height - 13.0) / 10.0).powf(1.5)
                };
                (18.0 / d_2d + (-d_2d / 63.0).exp() * (1.0 - 18.0 / d_2d))
                    * (1.0 + c * 1.25 * (d_2d / 100.0) * (-d_2d / 150.0).exp())
            }
        }
    };

    Ok(p.clamp(0.0, 1.0))
}

/// Bernoulli draw of the link condition. Not memoized: every call is an
/// independent draw.
pub fn sample_condition(
    area: AreaType,
    d_2d: f64,
    ue_height: f64,
    rng: &mut dyn RngCore,
) -> ModelResult<LinkCondition> {
    let p = los_probability(area, d_2d, ue_height)?;
    if rng.gen_bool(p) {
        Ok(LinkCondition::LineOfSight)
    } else {
        Ok(LinkCondition::NonLineOfSight)
    }
}
