//! Trial orchestration
//!
//! Each trial cycles RESET -> INJECT_FAILURE -> RECONNECT -> MEASURE for
//! every round of every severity level. Trials run on a bounded worker pool
//! and their per-severity observations are concatenated afterwards.

pub mod error;
pub mod pool;
pub mod runner;
pub mod trial;
pub mod types;

pub use error::{SimulationError, SimulationResult};
pub use pool::TrialPool;
pub use runner::SimulationRunner;
pub use trial::Trial;
pub use types::{CityReport, PhaseCycle, SeverityReport, TrialPhase};
