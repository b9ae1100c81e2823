use crate::allocation::AllocationError;
use crate::simulation::types::TrialPhase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),

    #[error("Modeling error: {0}")]
    ModelingError(#[from] crate::radio::ModelingError),

    #[error("Allocation error: {0}")]
    AllocationError(AllocationError),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidPhaseTransition {
        from: Option<TrialPhase>,
        to: TrialPhase,
    },

    #[error("Trial worker failed: {0}")]
    WorkerFailed(String),
}

pub type SimulationResult<T> = Result<T, SimulationError>;

// Propagation failures surface as modeling errors whichever layer hit them
impl From<AllocationError> for SimulationError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::Modeling(e) => SimulationError::ModelingError(e),
            other => SimulationError::AllocationError(other),
        }
    }
}
