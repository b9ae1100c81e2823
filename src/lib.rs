//! Monte-Carlo resilience simulator for mixed LTE / 5G NR radio networks.
//!
//! Users are scattered over a city, attached to base stations through a
//! propagation model and a tiered bandwidth allocator, then the network is
//! degraded by a failure policy at increasing severity. Every round yields a
//! set of resilience metrics which are aggregated across independent trials.

pub mod allocation;
pub mod config;
pub mod failure;
pub mod metrics;
pub mod network;
pub mod radio;
pub mod simulation;
pub mod topology;
