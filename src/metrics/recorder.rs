//! Metrics recorder for simulation batches
//!
//! Records trial throughput and resilience outcomes through the `metrics`
//! facade. Nothing is exported unless the host installs a recorder.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return; // Already initialized
    }

    // Trial counters
    describe_counter!(
        "resilsim_trials_started_total",
        "Total number of independent trials started"
    );
    describe_counter!(
        "resilsim_trials_completed_total",
        "Total number of trials that produced metrics"
    );
    describe_counter!(
        "resilsim_trials_failed_total",
        "Total number of trials aborted by an error"
    );
    describe_counter!(
        "resilsim_rounds_total",
        "Total number of reset/fail/reconnect/measure cycles"
    );
    describe_counter!(
        "resilsim_overflow_rollbacks_total",
        "Admissions rolled back because they starved a device"
    );

    // Gauges
    describe_gauge!("resilsim_trials_active", "Number of trials currently running");

    // Histograms
    describe_histogram!(
        "resilsim_trials_duration_seconds",
        "Wall-clock duration of one trial"
    );
    describe_histogram!(
        "resilsim_isolated_users_ratio",
        "Fraction of users left without a link after a round"
    );
}

// ============== Trial Operations ==============

/// Record a trial starting
pub fn record_trial_started(city: &str) {
    counter!("resilsim_trials_started_total", "city" => city.to_string()).increment(1);
    gauge!("resilsim_trials_active").increment(1.0);
}

/// Record a trial finishing successfully
pub fn record_trial_complete(city: &str, duration: Duration) {
    counter!("resilsim_trials_completed_total", "city" => city.to_string()).increment(1);
    gauge!("resilsim_trials_active").decrement(1.0);
    histogram!("resilsim_trials_duration_seconds").record(duration.as_secs_f64());
}

/// Record a trial failing
pub fn record_trial_failed(city: &str, reason: &str) {
    counter!("resilsim_trials_failed_total", "city" => city.to_string(), "reason" => reason.to_string()).increment(1);
    gauge!("resilsim_trials_active").decrement(1.0);
}

// ============== Round Metrics ==============

/// Record one measured round
pub fn record_round(severity: u32, isolated_ratio: Option<f64>) {
    counter!("resilsim_rounds_total", "severity" => severity.to_string()).increment(1);
    if let Some(ratio) = isolated_ratio {
        histogram!("resilsim_isolated_users_ratio", "severity" => severity.to_string())
            .record(ratio);
    }
}

/// Record rolled back admissions of a connection round
pub fn record_rollbacks(count: usize) {
    if count > 0 {
        counter!("resilsim_overflow_rollbacks_total").increment(count as u64);
    }
}

/// Helper struct to time a trial and record its outcome
pub struct TrialTimer {
    city: String,
    start_time: Instant,
}

impl TrialTimer {
    /// Start tracking a new trial
    pub fn start(city: impl Into<String>) -> Self {
        let city = city.into();
        record_trial_started(&city);

        Self {
            city,
            start_time: Instant::now(),
        }
    }

    /// Mark trial as complete
    pub fn complete(self) {
        record_trial_complete(&self.city, self.start_time.elapsed());
    }

    /// Mark trial as failed
    pub fn fail(self, reason: &str) {
        record_trial_failed(&self.city, reason);
    }

    /// Get current duration
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_metrics() {
        // Should not panic when called multiple times
        init_metrics();
        init_metrics();
    }

    #[test]
    fn test_trial_timer() {
        let timer = TrialTimer::start("test-city");
        std::thread::sleep(Duration::from_millis(10));
        assert!(timer.elapsed() >= Duration::from_millis(10));
        timer.complete(); // Should not panic
    }

    #[test]
    fn test_round_without_ratio() {
        record_round(0, None);
        record_round(3, Some(0.25));
        record_rollbacks(0);
        record_rollbacks(2);
    }
}
