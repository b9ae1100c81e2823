//! Radio propagation and capacity model
//!
//! Converts the geometry of a candidate UE <-> base station link into a
//! path loss, received power, SNR and finally a spectral efficiency that the
//! allocator turns into an achievable rate.

pub mod error;
pub mod link_budget;
pub mod los;
pub mod pathloss;
pub mod types;

pub use error::{ModelResult, ModelingError};
pub use link_budget::{received_power_db, shannon_capacity, snr, to_db, to_linear, PropagationModel};
pub use los::{los_probability, sample_condition};
pub use pathloss::{breakpoint_distance, model_for, PathLossModel};
pub use types::{AreaType, LinkBudget, LinkCondition, LinkGeometry, PathLossSample, RadioType};
