//! Partitioning engine.
//!
//! Turns a post's vote lines into countable [`VoteLineBlock`]s:
//! references are inlined into a [`WorkingVote`], then split according to
//! the selected [`PartitionMode`].
//!
//! [`VoteLineBlock`]: crate::vote::VoteLineBlock

pub mod mode;
pub mod partitioner;
pub mod plan;
pub mod working_vote;

pub use mode::PartitionMode;
pub use partitioner::partition;
pub use plan::{PlanDeclaration, content_block_name, find_declarations, normalize_plan};
pub use working_vote::{
    WorkingItem, WorkingVote, WorkingVoteResult, configure_working_vote, inline_under,
};
