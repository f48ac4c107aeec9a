//! Baldwin method: repeated Borda elimination.

use super::{Ballots, RankVoteCounter, RankedVote};
use crate::storage::VoterStorage;
use crate::vote::VoteLineBlock;

/// Each round scores the remaining votes by Borda count (one point per
/// remaining vote ranked below) and drops the lowest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Baldwin;

impl RankVoteCounter for Baldwin {
    fn name(&self) -> &'static str {
        "baldwin"
    }

    fn count_votes_for_task<'a>(
        &self,
        task_votes: &[(&'a VoteLineBlock, &'a VoterStorage)],
    ) -> Vec<RankedVote<'a>> {
        let ballots = Ballots::collect(task_votes);
        let measures = ballots.eliminate(|remaining| {
            let mut scores = vec![0.0; ballots.candidate_count()];
            for ballot in ballots.ballots() {
                for &c in remaining {
                    let below = remaining
                        .iter()
                        .filter(|&&other| Ballots::prefers(ballot, c, other))
                        .count();
                    scores[c] += below as f64;
                }
            }
            scores
        });
        ballots.finalize(&measures)
    }
}
