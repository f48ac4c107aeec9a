//! Application layer for quest-tally
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    post_source::{PostSource, PostSourceError, StaticPostSource},
    progress::{NoProgress, TallyProgressNotifier},
    tally_logger::{NoTallyLogger, PostRef, TallyEvent, TallyEventLogger},
};
pub use use_cases::report::{
    RankingEntry, SupporterEntry, TallyReport, TaskReport, VoteEntry, vote_text,
};
pub use use_cases::run_tally::{RunTallyError, RunTallyOutput, RunTallyUseCase};
