//! Instant runoff: first-preference elimination.

use super::{Ballots, RankVoteCounter, RankedVote};
use crate::storage::VoterStorage;
use crate::vote::VoteLineBlock;

/// Each round counts every ballot for its best remaining choice and drops
/// the vote with the fewest.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantRunoff;

impl RankVoteCounter for InstantRunoff {
    fn name(&self) -> &'static str {
        "instant_runoff"
    }

    fn count_votes_for_task<'a>(
        &self,
        task_votes: &[(&'a VoteLineBlock, &'a VoterStorage)],
    ) -> Vec<RankedVote<'a>> {
        let ballots = Ballots::collect(task_votes);
        let measures = ballots.eliminate(|remaining| {
            let mut first_choices = vec![0.0; ballots.candidate_count()];
            for ballot in ballots.ballots() {
                // Ballots are sorted best first
                if let Some(&(top, _)) = ballot.iter().find(|(c, _)| remaining.contains(c)) {
                    first_choices[top] += 1.0;
                }
            }
            first_choices
        });
        ballots.finalize(&measures)
    }
}
