//! Infrastructure layer for quest-tally
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod thread;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileOutputConfig, FileOutputFormat, FileQuestConfig};
pub use logging::JsonlTallyLogger;
pub use thread::{JsonPostSource, RawPost};
