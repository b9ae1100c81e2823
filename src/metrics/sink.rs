use crate::metrics::aggregate::MetricKind;
use crate::simulation::SeverityReport;
use tracing::info;

/// Receives the aggregated outcome of every (city, severity) pair
pub trait ResultSink: Send {
    fn accept(&mut self, city: &str, report: &SeverityReport);
}

/// Keeps every report in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub reports: Vec<(String, SeverityReport)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_city<'a>(&'a self, city: &'a str) -> impl Iterator<Item = &'a SeverityReport> + 'a {
        self.reports
            .iter()
            .filter(move |(name, _)| name == city)
            .map(|(_, report)| report)
    }
}

impl ResultSink for MemorySink {
    fn accept(&mut self, city: &str, report: &SeverityReport) {
        self.reports.push((city.to_string(), report.clone()));
    }
}

/// Logs one line per severity
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ResultSink for TracingSink {
    fn accept(&mut self, city: &str, report: &SeverityReport) {
        let values: Vec<String> = report
            .summary
            .entries
            .iter()
            .map(|e| match e.mean {
                Some(mean) => format!("{}={:.4}±{:.4}", e.kind.label(), mean, e.half_width),
                None => format!("{}=n/a", e.kind.label()),
            })
            .collect();

        info!(
            city,
            severity = report.severity,
            x = report.x_value,
            isolated = ?report.summary.mean(MetricKind::IsolatedUsers),
            "{}",
            values.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricSample, Metrics};

    fn report(severity: u32) -> SeverityReport {
        let mut metrics = Metrics::new();
        metrics.add(MetricSample::default().with(MetricKind::IsolatedUsers, 0.1));
        SeverityReport {
            severity,
            x_value: f64::from(severity),
            summary: metrics.summary(0.95),
            metrics,
        }
    }

    #[test]
    fn test_memory_sink_groups_by_city() {
        let mut sink = MemorySink::new();
        sink.accept("Utrecht", &report(0));
        sink.accept("Delft", &report(0));
        sink.accept("Utrecht", &report(1));

        let severities: Vec<u32> = sink.for_city("Utrecht").map(|r| r.severity).collect();
        assert_eq!(severities, vec![0, 1]);
        assert_eq!(sink.for_city("Zwolle").count(), 0);
    }

    #[test]
    fn test_tracing_sink_accepts() {
        let mut sink = TracingSink;
        sink.accept("Utrecht", &report(2));
    }
}
