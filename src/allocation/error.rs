use crate::network::{StationId, UserId};
use crate::radio::ModelingError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("Channel {frequency_mhz} MHz allocates {allocated} above ceiling {ceiling}")]
    InvariantViolation {
        frequency_mhz: f64,
        allocated: f64,
        ceiling: f64,
    },

    #[error("Unknown base station: {0}")]
    UnknownStation(StationId),

    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    #[error("Base station {0} has no enabled channel")]
    NoEnabledChannel(StationId),

    #[error("Modeling error: {0}")]
    Modeling(#[from] ModelingError),
}

pub type AllocationResult<T> = Result<T, AllocationError>;
