//! Borda count.

use super::{Ballots, RankVoteCounter, RankedVote};
use crate::storage::VoterStorage;
use crate::vote::VoteLineBlock;

/// Points for a rank: 9 for first place down to 1 for ninth.
pub fn rank_points(rank: u8) -> f64 {
    f64::from(10u8.saturating_sub(rank))
}

/// Ranks by summed rank points
#[derive(Debug, Clone, Copy, Default)]
pub struct Borda;

impl RankVoteCounter for Borda {
    fn name(&self) -> &'static str {
        "borda"
    }

    fn count_votes_for_task<'a>(
        &self,
        task_votes: &[(&'a VoteLineBlock, &'a VoterStorage)],
    ) -> Vec<RankedVote<'a>> {
        let ballots = Ballots::collect(task_votes);
        let mut points = vec![0.0; ballots.candidate_count()];
        for ballot in ballots.ballots() {
            for &(candidate, rank) in ballot {
                points[candidate] += rank_points(rank);
            }
        }
        ballots.finalize(&points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::test_support::{condorcet_storage, order};

    #[test]
    fn test_rank_points() {
        assert_eq!(rank_points(1), 9.0);
        assert_eq!(rank_points(9), 1.0);
    }

    #[test]
    fn test_borda_totals() {
        let storage = condorcet_storage();
        let ranked = Borda.count_votes_for_task(&storage.votes_for_task(""));
        assert_eq!(order(&ranked), ["Bravo", "Alpha", "Charlie"]);
        let scores: Vec<f64> = ranked.iter().map(|r| r.score.score).collect();
        assert_eq!(scores, [58.0, 57.0, 53.0]);
    }
}
