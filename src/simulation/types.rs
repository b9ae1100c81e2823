use crate::failure::FailurePolicy;
use crate::metrics::{Metrics, MetricsSummary};
use crate::simulation::error::{SimulationError, SimulationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Step of the per-round cycle a trial goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialPhase {
    Reset,
    InjectFailure,
    Reconnect,
    Measure,
}

impl TrialPhase {
    pub fn next(self) -> TrialPhase {
        match self {
            TrialPhase::Reset => TrialPhase::InjectFailure,
            TrialPhase::InjectFailure => TrialPhase::Reconnect,
            TrialPhase::Reconnect => TrialPhase::Measure,
            TrialPhase::Measure => TrialPhase::Reset,
        }
    }
}

/// Enforces RESET -> INJECT_FAILURE -> RECONNECT -> MEASURE ordering
#[derive(Debug, Clone, Default)]
pub struct PhaseCycle {
    current: Option<TrialPhase>,
    completed_rounds: u64,
}

impl PhaseCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<TrialPhase> {
        self.current
    }

    /// Number of rounds that reached MEASURE
    pub fn completed_rounds(&self) -> u64 {
        self.completed_rounds
    }

    pub fn transition(&mut self, to: TrialPhase) -> SimulationResult<TrialPhase> {
        let allowed = match (self.current, to) {
            (None, TrialPhase::Reset) => true,
            (Some(from), to) => from.next() == to,
            _ => false,
        };
        if !allowed {
            return Err(SimulationError::InvalidPhaseTransition {
                from: self.current,
                to,
            });
        }

        if to == TrialPhase::Measure {
            self.completed_rounds += 1;
        }
        self.current = Some(to);
        Ok(to)
    }
}

/// Aggregated outcome of one severity level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityReport {
    pub severity: u32,
    /// Policy-specific x-axis value (radius, functionality decrease, ...)
    pub x_value: f64,
    pub summary: MetricsSummary,
    pub metrics: Metrics,
}

/// Every severity level of one city batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityReport {
    pub run_id: Uuid,
    pub city: String,
    pub policy: FailurePolicy,
    pub axis_label: String,
    pub generated_at: DateTime<Utc>,
    /// Independent population resamples merged into the report
    pub trials: u32,
    pub severities: Vec<SeverityReport>,
}

impl CityReport {
    pub fn severity(&self, severity: u32) -> Option<&SeverityReport> {
        self.severities.iter().find(|s| s.severity == severity)
    }
}
