//! Use cases (application services)

pub mod report;
pub mod run_tally;
