//! Ballots built from rank markers.

use super::{RankScore, RankedVote};
use crate::storage::VoterStorage;
use crate::vote::{MarkerType, Origin, VoteLineBlock};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One voter's ranked choices: (candidate index, rank), best first
pub type Ballot = Vec<(usize, u8)>;

/// Candidates and ballots for one task
#[derive(Debug, Clone)]
pub struct Ballots<'a> {
    candidates: Vec<(&'a VoteLineBlock, &'a VoterStorage)>,
    ballots: Vec<Ballot>,
}

impl<'a> Ballots<'a> {
    /// Build ballots from every user supporter's rank markers.
    ///
    /// Plans and non-rank markers do not produce ballot entries.
    pub fn collect(task_votes: &[(&'a VoteLineBlock, &'a VoterStorage)]) -> Self {
        let mut by_voter: BTreeMap<&'a Origin, Ballot> = BTreeMap::new();
        for (index, &(_, supporters)) in task_votes.iter().enumerate() {
            for (origin, submitted) in supporters.iter() {
                if origin.is_user() && submitted.marker_type() == MarkerType::Rank {
                    by_voter
                        .entry(origin)
                        .or_default()
                        .push((index, submitted.marker_value()));
                }
            }
        }

        let ballots = by_voter
            .into_values()
            .map(|mut ballot| {
                ballot.sort_by_key(|&(candidate, rank)| (rank, candidate));
                ballot
            })
            .collect();

        Self {
            candidates: task_votes.to_vec(),
            ballots,
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    fn supporter_count(&self, candidate: usize) -> usize {
        self.candidates[candidate].1.user_count()
    }

    fn display(&self, candidate: usize) -> String {
        self.candidates[candidate].0.clean_text().to_lowercase()
    }

    /// Whether the ballot ranks `a` strictly above `b`.
    ///
    /// Ranked candidates beat unranked ones.
    pub fn prefers(ballot: &Ballot, a: usize, b: usize) -> bool {
        let rank = |c: usize| ballot.iter().find(|(cand, _)| *cand == c).map(|(_, r)| *r);
        match (rank(a), rank(b)) {
            (Some(ra), Some(rb)) => ra < rb,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// `d[a][b]`: number of ballots preferring `a` over `b`
    pub fn pairwise(&self) -> Vec<Vec<usize>> {
        let n = self.candidate_count();
        let mut d = vec![vec![0usize; n]; n];
        for ballot in &self.ballots {
            for a in 0..n {
                for b in 0..n {
                    if a != b && Self::prefers(ballot, a, b) {
                        d[a][b] += 1;
                    }
                }
            }
        }
        d
    }

    /// Order the candidates by `measures` (higher is better).
    ///
    /// Equal measures share a rank and are listed by supporter count, then
    /// by text.
    pub fn finalize(&self, measures: &[f64]) -> Vec<RankedVote<'a>> {
        let mut order: Vec<usize> = (0..self.candidate_count()).collect();
        order.sort_by(|&a, &b| {
            measures[b]
                .partial_cmp(&measures[a])
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.supporter_count(b).cmp(&self.supporter_count(a)))
                .then_with(|| self.display(a).cmp(&self.display(b)))
        });

        order
            .into_iter()
            .map(|c| {
                let better = measures.iter().filter(|&&m| m > measures[c]).count();
                RankedVote {
                    score: RankScore {
                        rank: better + 1,
                        score: measures[c],
                    },
                    vote: self.candidates[c].0,
                    supporters: self.candidates[c].1,
                }
            })
            .collect()
    }

    /// The candidate to drop in an elimination round.
    ///
    /// Lowest score loses; ties go against fewer supporters, then against
    /// the text that sorts last.
    pub fn elimination_loser(&self, remaining: &[usize], scores: &[f64]) -> Option<usize> {
        remaining.iter().copied().min_by(|&a, &b| {
            scores[a]
                .partial_cmp(&scores[b])
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.supporter_count(a).cmp(&self.supporter_count(b)))
                .then_with(|| self.display(b).cmp(&self.display(a)))
        })
    }

    /// Run elimination rounds until one candidate is left.
    ///
    /// `round_scores` scores the remaining candidates each round. The
    /// returned measure is the round a candidate was eliminated in, so the
    /// survivor scores highest.
    pub fn eliminate(&self, round_scores: impl Fn(&[usize]) -> Vec<f64>) -> Vec<f64> {
        let n = self.candidate_count();
        let mut measures = vec![0.0; n];
        let mut remaining: Vec<usize> = (0..n).collect();
        let mut round = 0usize;

        while remaining.len() > 1 {
            let scores = round_scores(&remaining);
            let Some(loser) = self.elimination_loser(&remaining, &scores) else {
                break;
            };
            measures[loser] = round as f64;
            remaining.retain(|&c| c != loser);
            round += 1;
        }
        for c in remaining {
            measures[c] = round as f64;
        }
        measures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::test_support::condorcet_storage;

    #[test]
    fn test_collect_builds_one_ballot_per_voter() {
        let storage = condorcet_storage();
        let task_votes = storage.votes_for_task("");
        let ballots = Ballots::collect(&task_votes);
        assert_eq!(ballots.candidate_count(), 3);
        assert_eq!(ballots.ballots().len(), 7);
        assert!(ballots.ballots().iter().all(|b| b.len() == 3));
    }

    #[test]
    fn test_pairwise_counts() {
        let storage = condorcet_storage();
        let task_votes = storage.votes_for_task("");
        let ballots = Ballots::collect(&task_votes);
        let d = ballots.pairwise();
        // Candidates are ordered Alpha, Bravo, Charlie
        assert_eq!((d[0][1], d[1][0]), (3, 4));
        assert_eq!((d[1][2], d[2][1]), (5, 2));
        assert_eq!((d[0][2], d[2][0]), (5, 2));
    }

    #[test]
    fn test_prefers_ranked_over_unranked() {
        let ballot: Ballot = vec![(2, 1)];
        assert!(Ballots::prefers(&ballot, 2, 0));
        assert!(!Ballots::prefers(&ballot, 0, 2));
        assert!(!Ballots::prefers(&ballot, 0, 1));
    }

    #[test]
    fn test_finalize_shares_ranks_for_ties() {
        let storage = condorcet_storage();
        let task_votes = storage.votes_for_task("");
        let ballots = Ballots::collect(&task_votes);
        let ranked = ballots.finalize(&[1.0, 2.0, 1.0]);
        let ranks: Vec<usize> = ranked.iter().map(|r| r.score.rank).collect();
        assert_eq!(ranks, [1, 2, 2]);
        assert_eq!(ranked[1].vote.first().clean_content(), "Alpha");
    }
}
