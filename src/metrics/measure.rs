use crate::metrics::aggregate::{MetricKind, MetricSample};
use crate::network::NetworkState;

/// Take one observation of every metric from the network after a
/// connection round. Isolated users count as zero satisfaction and zero SNR.
pub fn measure(state: &NetworkState, isolated_systems: usize) -> MetricSample {
    let mut sample = MetricSample::default();
    let user_count = state.users.len();

    let mut isolated = 0usize;
    let mut satisfaction_sum = 0.0;
    let mut half_satisfied = 0usize;
    let mut snr_sum = 0.0;
    let mut distances = Vec::new();

    for user in &state.users {
        let Some(link) = &user.link else {
            isolated += 1;
            continue;
        };
        let allocated = state
            .station(link.station)
            .map(|bs| bs.allocated_bandwidth(user.id))
            .unwrap_or(0.0);
        let capacity = link.shannon_capacity(allocated);
        let ratio = if user.requested_capacity > 0.0 {
            capacity / user.requested_capacity
        } else {
            1.0
        };

        satisfaction_sum += ratio.min(1.0);
        if ratio >= 0.5 {
            half_satisfied += 1;
        }
        snr_sum += link.snr;
        distances.push(link.distance_2d);
    }

    if user_count > 0 {
        let n = user_count as f64;
        sample.set(MetricKind::IsolatedUsers, Some(isolated as f64 / n));
        sample.set(MetricKind::Satisfaction, Some(satisfaction_sum / n));
        sample.set(MetricKind::HalfSatisfaction, Some(half_satisfied as f64 / n));
        sample.set(MetricKind::AvgSnr, Some(snr_sum / n));
    }
    if !distances.is_empty() {
        let mean = distances.iter().sum::<f64>() / distances.len() as f64;
        sample.set(MetricKind::AvgDistance, Some(mean));
    }

    sample.set(MetricKind::IsolatedSystems, Some(isolated_systems as f64));

    let active = state
        .stations
        .iter()
        .filter(|bs| bs.has_enabled_channel())
        .count();
    sample.set(MetricKind::ActiveStations, Some(active as f64));

    if !state.stations.is_empty() {
        let connected: usize = state.stations.iter().map(|bs| bs.connected_count()).sum();
        sample.set(
            MetricKind::ConnectedPerStation,
            Some(connected as f64 / state.stations.len() as f64),
        );
    }

    let enabled: usize = state
        .stations
        .iter()
        .map(|bs| bs.enabled_channel_count())
        .sum();
    sample.set(MetricKind::EnabledChannels, Some(enabled as f64));

    sample
}
