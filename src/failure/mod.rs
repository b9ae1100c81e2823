//! Failure injection
//!
//! One policy is active per batch. Each severity round it either degrades
//! station functionality, shifts user demand, or attenuates new links.

pub mod injector;
pub mod types;

pub use injector::FailureInjector;
pub use types::{FailurePolicy, FailureReport};
