//! Schulze method (beatpath / widest path).

use super::{Ballots, RankVoteCounter, RankedVote};
use crate::storage::VoterStorage;
use crate::vote::VoteLineBlock;

/// Condorcet-consistent ranking by strongest beatpaths
///
/// The score is the number of other candidates a vote beats on widest paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct Schulze;

impl Schulze {
    /// `p[a][b]`: strength of the widest path from `a` to `b`
    pub fn widest_paths(d: &[Vec<usize>]) -> Vec<Vec<usize>> {
        let n = d.len();
        let mut p = vec![vec![0usize; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j && d[i][j] > d[j][i] {
                    p[i][j] = d[i][j];
                }
            }
        }
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                for k in 0..n {
                    if k != i && k != j {
                        p[j][k] = p[j][k].max(p[j][i].min(p[i][k]));
                    }
                }
            }
        }
        p
    }
}

impl RankVoteCounter for Schulze {
    fn name(&self) -> &'static str {
        "schulze"
    }

    fn count_votes_for_task<'a>(
        &self,
        task_votes: &[(&'a VoteLineBlock, &'a VoterStorage)],
    ) -> Vec<RankedVote<'a>> {
        let ballots = Ballots::collect(task_votes);
        let p = Self::widest_paths(&ballots.pairwise());
        let n = ballots.candidate_count();
        let wins: Vec<f64> = (0..n)
            .map(|a| (0..n).filter(|&b| a != b && p[a][b] > p[b][a]).count() as f64)
            .collect();
        ballots.finalize(&wins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::test_support::{condorcet_storage, order};

    #[test]
    fn test_condorcet_winner_first() {
        let storage = condorcet_storage();
        let ranked = Schulze.count_votes_for_task(&storage.votes_for_task(""));
        assert_eq!(order(&ranked), ["Bravo", "Alpha", "Charlie"]);
        assert_eq!(ranked[0].score.score, 2.0);
        assert_eq!(ranked[2].score.rank, 3);
    }

    #[test]
    fn test_widest_paths_resolve_cycle() {
        // A>B 5, B>C 7, C>A 6: the weakest link A>B is overruled
        let d = vec![vec![0, 5, 3], vec![4, 0, 7], vec![6, 2, 0]];
        let p = Schulze::widest_paths(&d);
        assert_eq!(p[1][0], 6);
        assert_eq!(p[0][1], 5);
        assert!(p[1][0] > p[0][1]);
    }

    #[test]
    fn test_empty_task() {
        assert!(Schulze.count_votes_for_task(&[]).is_empty());
    }
}
