//! Domain layer for quest-tally
//!
//! This crate contains the vote grammar, partitioning, supporter storage and
//! ranking logic. It has no dependencies on infrastructure or presentation
//! concerns, and does no I/O.
//!
//! # Core Concepts
//!
//! ## Vote lines and blocks
//!
//! A post's vote is a list of [`VoteLine`]s such as `-[x][Task] Content`.
//! Lines are grouped into [`VoteLineBlock`]s, the unit that supporters back.
//!
//! ## Partitioning
//!
//! - **References**: lines naming another voter or a plan are replaced by
//!   that vote before counting
//! - **Partition modes**: [`PartitionMode`] decides how a vote is cut into
//!   blocks (whole vote, per line, per block, and so on)
//!
//! ## Storage and ranking
//!
//! [`VoteStorage`] maps each agnostic vote key to its supporters. Ranked
//! tasks are ordered by a [`RankingMethod`].

pub mod config;
pub mod core;
pub mod partition;
pub mod ranking;
pub mod reference;
pub mod storage;
pub mod tally;
pub mod vote;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, PostFilter, Severity, TallySettings};
pub use core::error::DomainError;
pub use partition::{PartitionMode, WorkingVote, partition};
pub use ranking::{RankScore, RankVoteCounter, RankedVote, RankingMethod};
pub use reference::{ReferenceLabel, ReferenceLookup, ResolveContext, UserVote};
pub use storage::{CategorizedVote, SupporterStorage, UndoKind, VoteStorage, VoterStorage};
pub use tally::{
    Plan, PlanRegistry, Post, PostOutcome, PostState, SkipReason, TallyStats, TaskList,
    VoteCounter,
};
pub use vote::{
    IdentityType, Marker, MarkerType, Origin, VoteLine, VoteLineBlock, parse_line, parse_lines,
};
