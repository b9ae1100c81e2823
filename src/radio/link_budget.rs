//! Received power, SNR and Shannon capacity

use crate::config::RadioConstants;
use crate::radio::error::ModelResult;
use crate::radio::los::sample_condition;
use crate::radio::pathloss::model_for;
use crate::radio::types::{AreaType, LinkBudget, LinkCondition, LinkGeometry, RadioType};
use rand::RngCore;

pub fn to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

pub fn to_db(linear: f64) -> f64 {
    10.0 * linear.log10()
}

/// Received power in dB.
///
/// LTE applies the antenna gains inside the path loss and floors the
/// resulting coupling loss at the MCL; NR adds the gains directly.
pub fn received_power_db(
    radio: RadioType,
    tx_power_db: f64,
    path_loss_db: f64,
    constants: &RadioConstants,
) -> f64 {
    let gains = constants.tx_gain_db + constants.rx_gain_db;
    match radio {
        RadioType::Lte => tx_power_db - (path_loss_db - gains).max(constants.mcl_db),
        RadioType::Nr => tx_power_db - path_loss_db + gains,
    }
}

/// Linear SNR against the fixed noise floor
pub fn snr(received_power_db: f64, noise_floor_db: f64) -> f64 {
    to_linear(received_power_db) / to_linear(noise_floor_db)
}

pub fn shannon_capacity(bandwidth: f64, snr: f64) -> f64 {
    bandwidth * (1.0 + snr).log2()
}

/// Geometry -> achievable rate per unit of bandwidth
#[derive(Debug, Clone)]
pub struct PropagationModel {
    constants: RadioConstants,
}

impl PropagationModel {
    pub fn new(constants: RadioConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &RadioConstants {
        &self.constants
    }

    /// Evaluate one candidate link.
    ///
    /// NR links draw a fresh LoS/NLoS condition; LTE links have no condition.
    /// `signal_factor` scales the received power in the linear domain.
    pub fn evaluate(
        &self,
        radio: RadioType,
        area: AreaType,
        geometry: &LinkGeometry,
        tx_power_db: f64,
        signal_factor: f64,
        rng: &mut dyn RngCore,
    ) -> ModelResult<LinkBudget> {
        let condition = match radio {
            RadioType::Nr => Some(sample_condition(
                area,
                geometry.distance_2d,
                geometry.ue_height,
                rng,
            )?),
            RadioType::Lte => None,
        };

        let model = model_for(radio, area);
        let path_loss = model.path_loss(
            geometry,
            condition.unwrap_or(LinkCondition::LineOfSight),
            &self.constants,
            rng,
        )?;

        let mut received_power_db =
            received_power_db(radio, tx_power_db, path_loss.total_db(), &self.constants);
        if signal_factor < 1.0 {
            received_power_db += to_db(signal_factor.max(f64::MIN_POSITIVE));
        }

        let snr = snr(received_power_db, self.constants.noise_floor_db);
        Ok(LinkBudget {
            condition,
            path_loss,
            received_power_db,
            snr,
            spectral_efficiency: (1.0 + snr).log2(),
        })
    }
}
