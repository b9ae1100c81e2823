use crate::allocation::error::{AllocationError, AllocationResult};
use crate::allocation::tiers::BandwidthTiers;
use crate::network::{BaseStation, ConnectedUser, UserId};
use std::cmp::Ordering;
use tracing::debug;

/// Station-level bandwidth arbitration
#[derive(Debug, Clone, Default)]
pub struct CapacityAllocator {
    tiers: BandwidthTiers,
}

impl CapacityAllocator {
    pub fn new(tiers: BandwidthTiers) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &BandwidthTiers {
        &self.tiers
    }

    /// Index of the enabled channel with the best (utilization, spare
    /// bandwidth); the earliest channel wins ties
    pub fn select_channel(&self, station: &BaseStation) -> Option<usize> {
        let mut best: Option<(usize, f64, f64)> = None;
        for (idx, channel) in station.channels().iter().enumerate() {
            if !channel.enabled {
                continue;
            }
            let key = (channel.utilization(), channel.band_left(&self.tiers));
            let better = match best {
                None => true,
                Some((_, utilization, band_left)) => {
                    match key.0.total_cmp(&utilization) {
                        Ordering::Greater => true,
                        Ordering::Equal => key.1 > band_left,
                        Ordering::Less => false,
                    }
                }
            };
            if better {
                best = Some((idx, key.0, key.1));
            }
        }
        best.map(|(idx, _, _)| idx)
    }

    /// Attach a user to the station and negotiate its bandwidth
    pub fn admit(
        &self,
        station: &mut BaseStation,
        user: UserId,
        bandwidth_needed: f64,
    ) -> AllocationResult<()> {
        let idx = self
            .select_channel(station)
            .ok_or(AllocationError::NoEnabledChannel(station.id))?;
        station.connected_mut().push(ConnectedUser {
            user,
            bandwidth_needed,
        });
        station.channels_mut()[idx].add_device(user, bandwidth_needed, &self.tiers)
    }

    /// Detach a user from the station and every channel it occupies
    pub fn release(&self, station: &mut BaseStation, user: UserId) -> AllocationResult<bool> {
        let before = station.connected_count();
        station.connected_mut().retain(|c| c.user != user);
        let mut found = station.connected_count() != before;
        for channel in station.channels_mut() {
            found |= channel.remove_device(user, &self.tiers)?;
        }
        Ok(found)
    }

    /// Re-derive every allocation of the station from scratch, admitting
    /// the remaining users by descending bandwidth need (ties by user id)
    pub fn repack(&self, station: &mut BaseStation) -> AllocationResult<()> {
        for channel in station.channels_mut() {
            channel.clear();
        }

        let mut users: Vec<ConnectedUser> = station.connected().to_vec();
        users.sort_by(|a, b| {
            b.bandwidth_needed
                .total_cmp(&a.bandwidth_needed)
                .then(a.user.cmp(&b.user))
        });
        *station.connected_mut() = users.clone();

        if users.is_empty() {
            return Ok(());
        }
        debug!(station = station.id, users = users.len(), "Repacking station");

        for connected in users {
            let idx = self
                .select_channel(station)
                .ok_or(AllocationError::NoEnabledChannel(station.id))?;
            station.channels_mut()[idx].add_device(
                connected.user,
                connected.bandwidth_needed,
                &self.tiers,
            )?;
        }
        Ok(())
    }
}
