use anyhow::Context;
use resilsim::config::SimulationConfig;
use resilsim::metrics::{MetricKind, TracingSink};
use resilsim::network::{BaseStation, BoundingBox, City, GeoPoint};
use resilsim::radio::{AreaType, RadioType};
use resilsim::simulation::SimulationRunner;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Square grid of stations over the city, alternating LTE and NR sites
fn synthetic_stations(bounds: &BoundingBox, per_side: usize) -> Vec<BaseStation> {
    let mut stations = Vec::with_capacity(per_side * per_side);
    let step_lon = (bounds.max_lon - bounds.min_lon) / per_side as f64;
    let step_lat = (bounds.max_lat - bounds.min_lat) / per_side as f64;

    for i in 0..per_side {
        for j in 0..per_side {
            let position = GeoPoint::new(
                bounds.min_lon + step_lon * (i as f64 + 0.5),
                bounds.min_lat + step_lat * (j as f64 + 0.5),
            );
            let id = stations.len();
            let mut station = if (i + j) % 2 == 0 {
                let mut bs = BaseStation::new(id, position, 30.0, RadioType::Lte);
                bs.add_channel(800.0, 43.0);
                bs.add_channel(1_800.0, 43.0);
                bs.add_channel(2_600.0, 43.0);
                bs
            } else {
                let mut bs = BaseStation::new(id, position, 25.0, RadioType::Nr);
                bs.add_channel(700.0, 40.0);
                bs.add_channel(3_500.0, 40.0);
                bs
            };
            station.range_m = 3_000.0;
            stations.push(station);
        }
    }
    stations
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_json_file(&path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => SimulationConfig {
            rounds_per_user: 10,
            severity_rounds: 5,
            ..SimulationConfig::default()
        },
    };

    let city = City::new(
        "Synthetic",
        BoundingBox::new(52.05, 5.05, 52.11, 5.15),
        50_000,
        AreaType::Uma,
    );
    let stations = synthetic_stations(&city.bounds, 5);

    let runner = SimulationRunner::new(config).context("invalid configuration")?;
    let mut sink = TracingSink;
    let reports = runner
        .run_all(&[(city, stations)], &mut sink)
        .await
        .context("simulation failed")?;

    for report in &reports {
        info!(
            run_id = %report.run_id,
            city = %report.city,
            policy = report.policy.name(),
            "{}",
            report.axis_label
        );
        for severity in &report.severities {
            let isolated = severity.summary.get(MetricKind::IsolatedUsers);
            let satisfied = severity.summary.get(MetricKind::Satisfaction);
            if let (Some(isolated), Some(satisfied)) = (isolated, satisfied) {
                info!(
                    "{:>10.2} | {}: {:.3} ±{:.3} | {}: {:.3} ±{:.3}",
                    severity.x_value,
                    MetricKind::IsolatedUsers.label(),
                    isolated.mean.unwrap_or(f64::NAN),
                    isolated.half_width,
                    MetricKind::Satisfaction.label(),
                    satisfied.mean.unwrap_or(f64::NAN),
                    satisfied.half_width,
                );
            }
        }
    }

    Ok(())
}
