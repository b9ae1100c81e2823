//! Resilience metrics
//!
//! Per-round observations (isolated users, satisfaction, distance, isolated
//! systems, active stations, SNR, load per station, enabled channels),
//! their cross-trial aggregation with Student-t confidence intervals, and
//! the `metrics` facade counters describing batch progress.

pub mod aggregate;
pub mod measure;
pub mod recorder;
pub mod sink;

pub use aggregate::{MetricKind, MetricSample, MetricSummary, Metrics, MetricsSummary};
pub use measure::measure;
pub use recorder::{init_metrics, TrialTimer};
pub use sink::{MemorySink, ResultSink, TracingSink};
