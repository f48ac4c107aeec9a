//! Ranked-vote counting strategies.
//!
//! Each strategy reads one task's votes, builds ballots from the rank markers
//! that user supporters submitted, and orders the votes. Selection goes
//! through [`RankingMethod`]; the chosen strategy is passed in explicitly.

pub mod ballot;
pub mod baldwin;
pub mod borda;
pub mod instant_runoff;
pub mod method;
pub mod schulze;
pub mod wilson;

pub use ballot::Ballots;
pub use method::RankingMethod;

use crate::storage::VoterStorage;
use crate::vote::VoteLineBlock;
use serde::Serialize;

/// Position and strength of one vote in a ranking
///
/// `rank` starts at 1; votes with equal strength share a rank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankScore {
    pub rank: usize,
    pub score: f64,
}

/// One entry of a ranked result
#[derive(Debug, Clone, Copy)]
pub struct RankedVote<'a> {
    pub score: RankScore,
    pub vote: &'a VoteLineBlock,
    pub supporters: &'a VoterStorage,
}

/// A ranked-vote counting algorithm
pub trait RankVoteCounter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Order one task's votes, best first.
    fn count_votes_for_task<'a>(
        &self,
        task_votes: &[(&'a VoteLineBlock, &'a VoterStorage)],
    ) -> Vec<RankedVote<'a>>;
}
