use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelingError {
    #[error("{model} model is not valid for d_2D = {distance_m:.1} m (limit {limit_m} m)")]
    DistanceOutOfRange {
        model: &'static str,
        distance_m: f64,
        limit_m: f64,
    },

    #[error("{model} model is not valid for UE height {height_m} m (limit {limit_m} m)")]
    HeightOutOfRange {
        model: &'static str,
        height_m: f64,
        limit_m: f64,
    },

    #[error("Unknown area type: {0}")]
    UnknownAreaType(String),

    #[error("Unknown radio type: {0}")]
    UnknownRadioType(String),

    #[error("Invalid model input: {0}")]
    InvalidInput(String),
}

pub type ModelResult<T> = Result<T, ModelingError>;
