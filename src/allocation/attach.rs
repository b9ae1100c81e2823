//! UE connection procedure
//!
//! Every user tries its in-range candidate stations nearest first and keeps
//! the first one that can take it without starving anybody.

use crate::allocation::allocator::CapacityAllocator;
use crate::allocation::error::{AllocationError, AllocationResult};
use crate::metrics::recorder;
use crate::network::{NetworkState, StationId, UeLink, UserId};
use crate::radio::{AreaType, LinkGeometry, PropagationModel};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Everything a connection round needs besides the network itself
#[derive(Debug, Clone, Copy)]
pub struct ConnectionContext<'a> {
    pub area: AreaType,
    pub propagation: &'a PropagationModel,
    pub allocator: &'a CapacityAllocator,
    /// Stations at or below this functionality are not candidates
    pub min_functionality: f64,
    /// Linear factor applied to the received power of every new link
    pub signal_factor: f64,
}

/// Outcome counters of one connection round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStats {
    pub connected: usize,
    pub isolated: usize,
    /// Admissions undone because they starved a device
    pub rollbacks: usize,
    /// Candidates skipped because the received power was too weak
    pub non_viable: usize,
}

/// In-range candidate stations for a user, nearest first (ties by id)
pub fn candidate_stations(
    state: &NetworkState,
    user: UserId,
    min_functionality: f64,
) -> AllocationResult<Vec<(StationId, f64)>> {
    let ue = state.user(user).ok_or(AllocationError::UnknownUser(user))?;
    let mut candidates: Vec<(StationId, f64)> = state
        .stations
        .iter()
        .filter(|bs| bs.accepts_connections(min_functionality))
        .filter_map(|bs| {
            let distance = ue.position.distance_to(&bs.position);
            (distance < bs.range_m).then_some((bs.id, distance))
        })
        .collect();
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    Ok(candidates)
}

/// Try to connect one user. Returns whether it ended up linked.
pub fn connect_user(
    state: &mut NetworkState,
    user: UserId,
    ctx: &ConnectionContext<'_>,
    rng: &mut dyn RngCore,
    stats: &mut ConnectionStats,
) -> AllocationResult<bool> {
    let candidates = candidate_stations(state, user, ctx.min_functionality)?;
    let constants = ctx.propagation.constants();

    for (station_id, distance_2d) in candidates {
        let (budget, geometry) = {
            let station = state
                .station(station_id)
                .ok_or(AllocationError::UnknownStation(station_id))?;
            let Some(carrier) = station.reference_channel() else {
                continue;
            };
            let geometry = LinkGeometry::new(
                distance_2d,
                carrier.frequency_mhz,
                station.height_m,
                constants.ue_height_m,
            );
            let budget = ctx.propagation.evaluate(
                station.radio,
                ctx.area,
                &geometry,
                carrier.tx_power_db,
                ctx.signal_factor,
                rng,
            )?;
            (budget, geometry)
        };

        if budget.received_power_db < constants.minimum_power_db {
            stats.non_viable += 1;
            continue;
        }

        let requested = state.users[user].requested_capacity;
        let bandwidth_needed = ctx
            .allocator
            .tiers()
            .required_for(requested, budget.spectral_efficiency);

        let station = state
            .station_mut(station_id)
            .ok_or(AllocationError::UnknownStation(station_id))?;
        ctx.allocator.admit(station, user, bandwidth_needed)?;

        if station.is_overflowing() {
            trace!(user, station = station_id, "Admission overflowed, rolling back");
            ctx.allocator.release(station, user)?;
            ctx.allocator.repack(station)?;
            stats.rollbacks += 1;
            continue;
        }

        state.users[user].link = Some(UeLink {
            station: station_id,
            distance_2d,
            distance_3d: geometry.distance_3d,
            condition: budget.condition,
            snr: budget.snr,
            spectral_efficiency: budget.spectral_efficiency,
            bandwidth_needed,
        });
        stats.connected += 1;
        return Ok(true);
    }

    stats.isolated += 1;
    Ok(false)
}

/// Connect every user in id order
pub fn connect_users(
    state: &mut NetworkState,
    ctx: &ConnectionContext<'_>,
    rng: &mut dyn RngCore,
) -> AllocationResult<ConnectionStats> {
    let mut stats = ConnectionStats::default();
    for user in 0..state.users.len() {
        connect_user(state, user, ctx, rng, &mut stats)?;
    }

    debug!(
        connected = stats.connected,
        isolated = stats.isolated,
        rollbacks = stats.rollbacks,
        non_viable = stats.non_viable,
        "Connection round finished"
    );
    recorder::record_rollbacks(stats.rollbacks);
    Ok(stats)
}
