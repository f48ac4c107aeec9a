//! Tally report: an owned, serializable snapshot of a finished tally.

use serde::Serialize;
use tally_domain::{
    IdentityType, MarkerType, PartitionMode, RankingMethod, TallyStats, VoteCounter,
    VoteLineBlock, VoterStorage,
};

/// One supporter of a vote
#[derive(Debug, Clone, Serialize)]
pub struct SupporterEntry {
    pub name: String,
    pub identity: IdentityType,
    /// The marker this supporter submitted, e.g. `[x]` or `[2]`
    pub marker: String,
    pub post_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
}

/// One vote with its supporters
#[derive(Debug, Clone, Serialize)]
pub struct VoteEntry {
    /// The vote text without markers, one line per vote line
    pub text: String,
    pub category: MarkerType,
    /// Number of user supporters; plans are listed but not counted
    pub support: usize,
    pub supporters: Vec<SupporterEntry>,
}

/// A ranked position within a task
#[derive(Debug, Clone, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub score: f64,
    pub text: String,
}

/// All votes filed under one task
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    /// Empty for votes without a task
    pub task: String,
    pub ranked: bool,
    pub votes: Vec<VoteEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ranking: Vec<RankingEntry>,
}

/// Result of a tally run
#[derive(Debug, Clone, Serialize)]
pub struct TallyReport {
    pub partition_mode: PartitionMode,
    pub ranking_method: RankingMethod,
    pub tasks: Vec<TaskReport>,
    pub stats: TallyStats,
}

impl TallyReport {
    /// Build a report from a counter's current state.
    ///
    /// Untasked votes come first, then tasks in the order the counter's task
    /// list holds them, then any remaining tasks (e.g. from manual edits).
    pub fn from_counter(counter: &VoteCounter) -> Self {
        let votes = counter.storage().votes();

        let mut task_names: Vec<String> = vec![String::new()];
        let in_storage = votes.tasks();
        for task in counter.tasks().iter().chain(in_storage.iter().map(String::as_str)) {
            if !task_names.iter().any(|t| t.eq_ignore_ascii_case(task)) {
                task_names.push(task.to_string());
            }
        }

        let tasks = task_names
            .into_iter()
            .filter_map(|task| {
                let task_votes = votes.votes_for_task(&task);
                if task_votes.is_empty() {
                    return None;
                }

                let mut entries: Vec<VoteEntry> = task_votes
                    .iter()
                    .map(|&(vote, supporters)| VoteEntry {
                        text: vote_text(vote),
                        category: votes.category_of(vote),
                        support: supporters.user_count(),
                        supporters: supporter_entries(supporters),
                    })
                    .collect();
                entries.sort_by(|a, b| b.support.cmp(&a.support));

                let ranked = counter.is_ranked_task(&task);
                let ranking = if ranked {
                    counter
                        .ranked_results(&task)
                        .into_iter()
                        .map(|r| RankingEntry {
                            rank: r.score.rank,
                            score: r.score.score,
                            text: vote_text(r.vote),
                        })
                        .collect()
                } else {
                    Vec::new()
                };

                Some(TaskReport {
                    task,
                    ranked,
                    votes: entries,
                    ranking,
                })
            })
            .collect();

        Self {
            partition_mode: counter.settings().partition_mode,
            ranking_method: counter.settings().ranking_method,
            tasks,
            stats: counter.stats(),
        }
    }

    /// Total number of distinct votes across all tasks
    pub fn vote_count(&self) -> usize {
        self.tasks.iter().map(|t| t.votes.len()).sum()
    }
}

/// Render a vote's lines as `prefix[task] content` without markers.
pub fn vote_text(vote: &VoteLineBlock) -> String {
    vote.lines()
        .iter()
        .map(|line| {
            if line.task().is_empty() {
                format!("{}{}", line.prefix(), line.content())
            } else {
                format!("{}[{}] {}", line.prefix(), line.task(), line.content())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn supporter_entries(supporters: &VoterStorage) -> Vec<SupporterEntry> {
    let mut entries: Vec<SupporterEntry> = supporters
        .iter()
        .map(|(origin, submitted)| SupporterEntry {
            name: origin.to_string(),
            identity: origin.identity(),
            marker: submitted.marker().to_string(),
            post_number: origin.post_number(),
            permalink: Some(origin.permalink())
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        })
        .collect();
    entries.sort_by_key(|e| (e.identity, e.post_number));
    entries
}
