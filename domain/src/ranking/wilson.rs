//! Wilson score ranking over pairwise contests.

use super::{Ballots, RankVoteCounter, RankedVote};
use crate::storage::VoterStorage;
use crate::vote::VoteLineBlock;

/// 95% confidence
const Z: f64 = 1.96;

/// Lower bound of the Wilson score interval for `wins` out of `total`.
pub fn lower_bound(wins: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    let p = wins as f64 / n;
    let z2 = Z * Z;
    (p + z2 / (2.0 * n) - Z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt()) / (1.0 + z2 / n)
}

/// Ranks by the share of pairwise contests a vote wins, discounted for how
/// few contests there were
#[derive(Debug, Clone, Copy, Default)]
pub struct Wilson;

impl RankVoteCounter for Wilson {
    fn name(&self) -> &'static str {
        "wilson"
    }

    fn count_votes_for_task<'a>(
        &self,
        task_votes: &[(&'a VoteLineBlock, &'a VoterStorage)],
    ) -> Vec<RankedVote<'a>> {
        let ballots = Ballots::collect(task_votes);
        let d = ballots.pairwise();
        let n = ballots.candidate_count();
        let scores: Vec<f64> = (0..n)
            .map(|a| {
                let wins: usize = (0..n).map(|b| d[a][b]).sum();
                let losses: usize = (0..n).map(|b| d[b][a]).sum();
                lower_bound(wins, wins + losses)
            })
            .collect();
        ballots.finalize(&scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::test_support::{condorcet_storage, order};

    #[test]
    fn test_lower_bound() {
        assert_eq!(lower_bound(0, 0), 0.0);
        let strong = lower_bound(90, 100);
        let weak = lower_bound(9, 10);
        assert!(strong > weak);
        assert!(strong < 0.9 && strong > 0.8);
    }

    #[test]
    fn test_wilson_order() {
        let storage = condorcet_storage();
        let ranked = Wilson.count_votes_for_task(&storage.votes_for_task(""));
        assert_eq!(order(&ranked), ["Bravo", "Alpha", "Charlie"]);
        assert!(ranked.iter().all(|r| (0.0..1.0).contains(&r.score.score)));
    }
}
