//! Tally settings for one quest.

use crate::core::agnostic;
use crate::partition::PartitionMode;
use crate::ranking::RankingMethod;
use crate::vote::Origin;
use serde::{Deserialize, Serialize};

/// Which posts take part in a tally
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFilter {
    /// First thread post number counted (inclusive)
    pub start_post: Option<u64>,
    /// Last thread post number counted (inclusive)
    pub end_post: Option<u64>,
    /// Authors whose posts are ignored (agnostic match)
    pub excluded_authors: Vec<String>,
    /// Thread post numbers that are ignored
    pub excluded_posts: Vec<u64>,
}

impl PostFilter {
    /// Whether a post by `origin` is excluded from the tally.
    pub fn excludes(&self, origin: &Origin) -> bool {
        let number = origin.post_number();
        self.start_post.is_some_and(|start| number < start)
            || self.end_post.is_some_and(|end| number > end)
            || self.excluded_posts.contains(&number)
            || self
                .excluded_authors
                .iter()
                .any(|name| agnostic::agnostic_eq(name, origin.author()))
    }
}

/// Settings that shape how a quest's votes are counted
///
/// # Example
///
/// ```
/// use tally_domain::{PartitionMode, RankingMethod, TallySettings};
///
/// let settings = TallySettings::default()
///     .with_partition_mode(PartitionMode::ByLine)
///     .with_ranking_method(RankingMethod::Borda);
/// assert!(settings.allow_proxy_votes);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallySettings {
    pub partition_mode: PartitionMode,
    /// Allow lines that name another user to count as that user's vote
    pub allow_proxy_votes: bool,
    /// Treat every user reference as pinned to earlier posts
    pub force_pinned_proxy_votes: bool,
    /// Drop `[spoiler]` sections before reading votes
    pub ignore_spoilers: bool,
    /// Only count votes under these tasks; empty counts everything
    pub task_filter: Vec<String>,
    /// Block headers that declare a plan even without a `Plan` label
    #[serde(default)]
    pub custom_plans: Vec<String>,
    pub ranking_method: RankingMethod,
    pub post_filter: PostFilter,
}

impl Default for TallySettings {
    fn default() -> Self {
        Self {
            partition_mode: PartitionMode::default(),
            allow_proxy_votes: true,
            force_pinned_proxy_votes: false,
            ignore_spoilers: true,
            task_filter: Vec::new(),
            custom_plans: Vec::new(),
            ranking_method: RankingMethod::default(),
            post_filter: PostFilter::default(),
        }
    }
}

impl TallySettings {
    pub fn with_partition_mode(mut self, mode: PartitionMode) -> Self {
        self.partition_mode = mode;
        self
    }

    pub fn with_ranking_method(mut self, method: RankingMethod) -> Self {
        self.ranking_method = method;
        self
    }

    pub fn with_proxy_votes(mut self, allow: bool) -> Self {
        self.allow_proxy_votes = allow;
        self
    }

    pub fn with_forced_pinned_proxies(mut self, force: bool) -> Self {
        self.force_pinned_proxy_votes = force;
        self
    }

    pub fn with_ignore_spoilers(mut self, ignore: bool) -> Self {
        self.ignore_spoilers = ignore;
        self
    }

    pub fn with_task_filter(mut self, tasks: Vec<String>) -> Self {
        self.task_filter = tasks;
        self
    }

    pub fn with_custom_plans(mut self, names: Vec<String>) -> Self {
        self.custom_plans = names;
        self
    }

    pub fn with_post_filter(mut self, filter: PostFilter) -> Self {
        self.post_filter = filter;
        self
    }

    /// Whether a vote under `task` passes the task filter.
    pub fn accepts_task(&self, task: &str) -> bool {
        self.task_filter.is_empty()
            || self
                .task_filter
                .iter()
                .any(|allowed| agnostic::agnostic_eq(allowed, task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TallySettings::default();
        assert_eq!(settings.partition_mode, PartitionMode::ByBlock);
        assert!(settings.allow_proxy_votes);
        assert!(!settings.force_pinned_proxy_votes);
        assert!(settings.ignore_spoilers);
        assert_eq!(settings.ranking_method, RankingMethod::Schulze);
    }

    #[test]
    fn test_task_filter() {
        let open = TallySettings::default();
        assert!(open.accepts_task("anything"));

        let filtered = TallySettings::default().with_task_filter(vec!["Build".to_string()]);
        assert!(filtered.accepts_task("build"));
        assert!(!filtered.accepts_task("Tactics"));
        assert!(!filtered.accepts_task(""));
    }

    #[test]
    fn test_post_filter_window_and_exclusions() {
        let filter = PostFilter {
            start_post: Some(10),
            end_post: Some(20),
            excluded_authors: vec!["Quest Master".to_string()],
            excluded_posts: vec![15],
        };
        assert!(filter.excludes(&Origin::new("Alice", 1, 9)));
        assert!(filter.excludes(&Origin::new("Alice", 1, 21)));
        assert!(filter.excludes(&Origin::new("Alice", 1, 15)));
        assert!(filter.excludes(&Origin::new("questmaster", 1, 12)));
        assert!(!filter.excludes(&Origin::new("Alice", 1, 12)));
        assert!(!PostFilter::default().excludes(&Origin::new("Alice", 1, 1)));
    }
}
