//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod post_source;
pub mod progress;
pub mod tally_logger;
