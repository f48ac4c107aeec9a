//! Logging infrastructure: structured tally event logging.
//!
//! Provides [`JsonlTallyLogger`], a JSONL file writer that implements
//! the [`TallyEventLogger`](tally_application::TallyEventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlTallyLogger;
