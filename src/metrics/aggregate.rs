//! Cross-trial metric accumulation and Student-t summaries

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::fmt;
use tracing::warn;

/// Scalar observations taken after every measured round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    IsolatedUsers,
    Satisfaction,
    HalfSatisfaction,
    AvgDistance,
    IsolatedSystems,
    ActiveStations,
    AvgSnr,
    ConnectedPerStation,
    EnabledChannels,
}

impl MetricKind {
    pub const COUNT: usize = 9;

    pub const ALL: [MetricKind; MetricKind::COUNT] = [
        MetricKind::IsolatedUsers,
        MetricKind::Satisfaction,
        MetricKind::HalfSatisfaction,
        MetricKind::AvgDistance,
        MetricKind::IsolatedSystems,
        MetricKind::ActiveStations,
        MetricKind::AvgSnr,
        MetricKind::ConnectedPerStation,
        MetricKind::EnabledChannels,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Axis label used by sinks and plots
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::IsolatedUsers => "Isolated Users (%)",
            MetricKind::Satisfaction => "Satisfaction level (%)",
            MetricKind::HalfSatisfaction => "50% Satisfaction level (%)",
            MetricKind::AvgDistance => "Avg. Distance to BS (meters)",
            MetricKind::IsolatedSystems => "#Isolated Systems",
            MetricKind::ActiveStations => "#Active BS",
            MetricKind::AvgSnr => "Avg. SNR (ratio)",
            MetricKind::ConnectedPerStation => "Avg. #users connected to BS",
            MetricKind::EnabledChannels => "#Enabled channels",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One observation of every metric; `None` marks an undefined value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    values: [Option<f64>; MetricKind::COUNT],
}

impl MetricSample {
    pub fn get(&self, kind: MetricKind) -> Option<f64> {
        self.values[kind.index()]
    }

    pub fn set(&mut self, kind: MetricKind, value: Option<f64>) {
        self.values[kind.index()] = value;
    }

    pub fn with(mut self, kind: MetricKind, value: f64) -> Self {
        self.set(kind, Some(value));
        self
    }
}

/// Observations accumulated for one severity level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    observations: Vec<MetricSample>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sample: MetricSample) {
        self.observations.push(sample);
    }

    /// Concatenate another accumulator's observations
    pub fn merge(&mut self, other: Metrics) {
        self.observations.extend(other.observations);
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Defined values of one metric
    pub fn values(&self, kind: MetricKind) -> Vec<f64> {
        self.observations.iter().filter_map(|s| s.get(kind)).collect()
    }

    pub fn mean(&self, kind: MetricKind) -> Option<f64> {
        mean(&self.values(kind))
    }

    /// Half-width of the Student-t confidence interval around the mean.
    /// Zero with fewer than two defined observations.
    pub fn confidence_half_width(&self, kind: MetricKind, confidence: f64) -> f64 {
        half_width(&self.values(kind), confidence)
    }

    pub fn summary(&self, confidence: f64) -> MetricsSummary {
        let entries = MetricKind::ALL
            .iter()
            .map(|&kind| {
                let values = self.values(kind);
                MetricSummary {
                    kind,
                    mean: mean(&values),
                    half_width: half_width(&values, confidence),
                    observations: values.len(),
                }
            })
            .collect();
        MetricsSummary { entries }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub kind: MetricKind,
    pub mean: Option<f64>,
    pub half_width: f64,
    pub observations: usize,
}

/// Mean and confidence half-width of every metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub entries: Vec<MetricSummary>,
}

impl MetricsSummary {
    pub fn get(&self, kind: MetricKind) -> Option<&MetricSummary> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn mean(&self, kind: MetricKind) -> Option<f64> {
        self.get(kind).and_then(|e| e.mean)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn half_width(values: &[f64], confidence: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let Some(m) = mean(values) else {
        return 0.0;
    };
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    let standard_error = (variance / n as f64).sqrt();
    if standard_error == 0.0 {
        return 0.0;
    }

    match StudentsT::new(0.0, 1.0, (n - 1) as f64) {
        Ok(dist) => standard_error * dist.inverse_cdf((1.0 + confidence) / 2.0),
        Err(e) => {
            warn!("Cannot build t distribution with {} observations: {}", n, e);
            0.0
        }
    }
}
