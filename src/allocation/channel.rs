use crate::allocation::error::{AllocationError, AllocationResult};
use crate::allocation::tiers::BandwidthTiers;
use crate::network::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Slack for floating point sums compared against the ceiling
const CEILING_EPSILON: f64 = 1e-9;

/// One omnidirectional carrier of a base station.
///
/// `desired` records the tier each device asked for, `allocated` what the
/// negotiation left it with (a tier value or zero). Both maps are keyed by
/// user id so iteration, and therefore tie-breaking, is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub frequency_mhz: f64,
    pub tx_power_db: f64,
    pub enabled: bool,
    desired: BTreeMap<UserId, f64>,
    allocated: BTreeMap<UserId, f64>,
}

impl Channel {
    pub fn new(frequency_mhz: f64, tx_power_db: f64) -> Self {
        Self {
            frequency_mhz,
            tx_power_db,
            enabled: true,
            desired: BTreeMap::new(),
            allocated: BTreeMap::new(),
        }
    }

    /// Register a device and renegotiate until the channel fits its ceiling.
    ///
    /// The device holding the largest allocation (lowest id on ties) is
    /// moved one tier down per step. A device already at the lowest tier is
    /// starved instead, which ends the pass.
    pub fn add_device(
        &mut self,
        user: UserId,
        bandwidth: f64,
        tiers: &BandwidthTiers,
    ) -> AllocationResult<()> {
        self.desired.insert(user, bandwidth);
        self.allocated.insert(user, bandwidth);

        while self.band_left(tiers) < 0.0 {
            let Some((victim, current)) = self.largest_allocation() else {
                break;
            };
            match tiers.next_below(current) {
                Some(lower) => {
                    trace!(user = victim, from = current, to = lower, "Demoting allocation");
                    self.allocated.insert(victim, lower);
                }
                None => {
                    trace!(user = victim, "Starving device at lowest tier");
                    self.allocated.insert(victim, 0.0);
                    break;
                }
            }
        }

        self.check_ceiling(tiers)
    }

    /// Forget a device; returns whether it was registered here
    pub fn remove_device(&mut self, user: UserId, tiers: &BandwidthTiers) -> AllocationResult<bool> {
        self.desired.remove(&user);
        let removed = self.allocated.remove(&user).is_some();
        self.check_ceiling(tiers)?;
        Ok(removed)
    }

    pub fn allocation(&self, user: UserId) -> Option<f64> {
        self.allocated.get(&user).copied()
    }

    pub fn desired(&self, user: UserId) -> Option<f64> {
        self.desired.get(&user).copied()
    }

    pub fn device_count(&self) -> usize {
        self.allocated.len()
    }

    pub fn total_allocated(&self) -> f64 {
        self.allocated.values().sum()
    }

    pub fn total_desired(&self) -> f64 {
        self.desired.values().sum()
    }

    pub fn band_left(&self, tiers: &BandwidthTiers) -> f64 {
        tiers.ceiling() - self.total_allocated()
    }

    /// Share of the desired bandwidth actually granted; 1 when empty
    pub fn utilization(&self) -> f64 {
        let desired = self.total_desired();
        if self.allocated.is_empty() || desired <= 0.0 {
            return 1.0;
        }
        self.total_allocated() / desired
    }

    pub fn clear(&mut self) {
        self.desired.clear();
        self.allocated.clear();
    }

    pub fn check_ceiling(&self, tiers: &BandwidthTiers) -> AllocationResult<()> {
        let allocated = self.total_allocated();
        if allocated > tiers.ceiling() + CEILING_EPSILON {
            return Err(AllocationError::InvariantViolation {
                frequency_mhz: self.frequency_mhz,
                allocated,
                ceiling: tiers.ceiling(),
            });
        }
        Ok(())
    }

    fn largest_allocation(&self) -> Option<(UserId, f64)> {
        let mut best: Option<(UserId, f64)> = None;
        for (&user, &bandwidth) in &self.allocated {
            match best {
                Some((_, current)) if bandwidth <= current => {}
                _ => best = Some((user, bandwidth)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> Channel {
        Channel::new(1_800.0, 43.0)
    }

    #[test]
    fn test_three_equal_devices_demote_lowest_ids() {
        let tiers = BandwidthTiers::default();
        let mut ch = channel();

        ch.add_device(0, 10.0, &tiers).unwrap();
        ch.add_device(1, 10.0, &tiers).unwrap();
        assert_eq!(ch.allocation(0), Some(10.0));
        assert_eq!(ch.allocation(1), Some(10.0));
        assert_eq!(ch.band_left(&tiers), 0.0);

        ch.add_device(2, 10.0, &tiers).unwrap();
        assert_eq!(ch.allocation(0), Some(5.0));
        assert_eq!(ch.allocation(1), Some(5.0));
        assert_eq!(ch.allocation(2), Some(10.0));
        assert!(ch.total_allocated() <= tiers.ceiling());
        assert_eq!(ch.desired(0), Some(10.0));
    }

    #[test]
    fn test_single_demotion_when_enough() {
        let tiers = BandwidthTiers::default();
        let mut ch = channel();
        ch.add_device(0, 15.0, &tiers).unwrap();
        ch.add_device(1, 5.0, &tiers).unwrap();
        assert_eq!(ch.band_left(&tiers), 0.0);

        // 15 + 5 + 10 = 30: the 15 drops to 10, still 25, then a 10 drops
        ch.add_device(2, 10.0, &tiers).unwrap();
        assert_eq!(ch.allocation(0), Some(5.0));
        assert_eq!(ch.allocation(1), Some(5.0));
        assert_eq!(ch.allocation(2), Some(10.0));
    }

    #[test]
    fn test_one_step_demotion_only_touches_largest() {
        let tiers = BandwidthTiers::default();
        let mut ch = channel();
        ch.add_device(0, 15.0, &tiers).unwrap();
        ch.add_device(1, 3.0, &tiers).unwrap();
        // 15 + 3 + 5 = 23: one demotion of the 15 suffices
        ch.add_device(2, 5.0, &tiers).unwrap();
        assert_eq!(ch.allocation(0), Some(10.0));
        assert_eq!(ch.allocation(1), Some(3.0));
        assert_eq!(ch.allocation(2), Some(5.0));
    }

    #[test]
    fn test_lowest_tier_device_is_starved() {
        let tiers = BandwidthTiers::new(vec![3.0, 1.0]).unwrap();
        let mut ch = channel();
        for user in 0..3 {
            ch.add_device(user, 1.0, &tiers).unwrap();
        }
        ch.add_device(3, 1.0, &tiers).unwrap();
        assert_eq!(ch.allocation(0), Some(0.0));
        assert_eq!(ch.total_allocated(), 3.0);
        assert_eq!(ch.device_count(), 4);
    }

    #[test]
    fn test_ceiling_holds_under_random_insertions() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let tiers = BandwidthTiers::default();
        let mut rng = StdRng::seed_from_u64(77);
        for _ in 0..200 {
            let mut ch = channel();
            for user in 0..rng.gen_range(1..12) {
                let tier = tiers.as_slice()[rng.gen_range(0..tiers.as_slice().len())];
                ch.add_device(user, tier, &tiers).unwrap();
                assert!(ch.total_allocated() <= tiers.ceiling() + 1e-9);
                for u in 0..=user {
                    let a = ch.allocation(u).unwrap();
                    assert!(a == 0.0 || tiers.contains(a));
                }
            }
        }
    }

    #[test]
    fn test_utilization_and_removal() {
        let tiers = BandwidthTiers::default();
        let mut ch = channel();
        assert_eq!(ch.utilization(), 1.0);

        ch.add_device(0, 20.0, &tiers).unwrap();
        ch.add_device(1, 20.0, &tiers).unwrap();
        assert!((ch.utilization() - 0.5).abs() < 1e-12);

        assert!(ch.remove_device(0, &tiers).unwrap());
        assert!(!ch.remove_device(0, &tiers).unwrap());
        assert_eq!(ch.device_count(), 1);

        ch.clear();
        assert_eq!(ch.device_count(), 0);
        assert_eq!(ch.band_left(&tiers), 20.0);
    }
}
