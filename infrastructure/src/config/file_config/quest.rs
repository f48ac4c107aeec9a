//! Quest tally configuration from TOML (`[quest]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [quest]
//! partition_mode = "block_all"
//! ranking_method = "borda"
//! task_filter = ["Army", "Build"]
//! custom_plans = ["Operation Nightfall"]
//! start_post = 120
//! excluded_authors = ["QuestMaster"]
//! ```

use serde::{Deserialize, Serialize};
use tally_domain::config::validation::{ConfigIssue, ConfigIssueCode, Severity};
use tally_domain::{DomainError, PartitionMode, PostFilter, RankingMethod, TallySettings};

/// Raw quest configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQuestConfig {
    /// "none", "line", "line_task", "block" or "block_all"
    pub partition_mode: String,
    /// Resolve references to other voters' names
    pub allow_proxy_votes: bool,
    /// Treat every user reference as pinned to posts before the voter's
    pub force_pinned_proxy_votes: bool,
    /// Drop `[spoiler]` sections before reading votes
    pub ignore_spoilers: bool,
    /// Tasks to count; empty counts all
    pub task_filter: Vec<String>,
    /// Block headers registered as plans without a `Plan` label
    pub custom_plans: Vec<String>,
    /// "schulze", "baldwin", "borda", "instant_runoff" or "wilson"
    pub ranking_method: String,
    /// First thread post number counted
    pub start_post: Option<u64>,
    /// Last thread post number counted
    pub end_post: Option<u64>,
    pub excluded_authors: Vec<String>,
    /// Thread post numbers to ignore
    pub excluded_posts: Vec<u64>,
}

impl Default for FileQuestConfig {
    fn default() -> Self {
        let settings = TallySettings::default();
        Self {
            partition_mode: settings.partition_mode.as_str().to_string(),
            allow_proxy_votes: settings.allow_proxy_votes,
            force_pinned_proxy_votes: settings.force_pinned_proxy_votes,
            ignore_spoilers: settings.ignore_spoilers,
            task_filter: Vec::new(),
            custom_plans: Vec::new(),
            ranking_method: settings.ranking_method.as_str().to_string(),
            start_post: None,
            end_post: None,
            excluded_authors: Vec::new(),
            excluded_posts: Vec::new(),
        }
    }
}

impl FileQuestConfig {
    /// Parse partition_mode into PartitionMode enum
    ///
    /// An unknown mode is an error: the tally must not run with it.
    pub fn parse_partition_mode(&self) -> (PartitionMode, Vec<ConfigIssue>) {
        match self.partition_mode.parse::<PartitionMode>() {
            Ok(mode) => (mode, vec![]),
            Err(_) => {
                let issue = ConfigIssue {
                    severity: Severity::Error,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "quest.partition_mode".to_string(),
                        value: self.partition_mode.clone(),
                        valid_values: PartitionMode::ALL
                            .iter()
                            .map(|m| m.as_str().to_string())
                            .collect(),
                    },
                    message: format!(
                        "quest.partition_mode: unknown value '{}'",
                        self.partition_mode
                    ),
                };
                (PartitionMode::default(), vec![issue])
            }
        }
    }

    /// Parse ranking_method into RankingMethod enum
    ///
    /// Unknown names fall back to the default method.
    pub fn parse_ranking_method(&self) -> (RankingMethod, Vec<ConfigIssue>) {
        match self.ranking_method.parse::<RankingMethod>() {
            Ok(method) => (method, vec![]),
            Err(_) => {
                let issue = ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "quest.ranking_method".to_string(),
                        value: self.ranking_method.clone(),
                        valid_values: RankingMethod::ALL
                            .iter()
                            .map(|m| m.as_str().to_string())
                            .collect(),
                    },
                    message: format!(
                        "quest.ranking_method: unknown value '{}', falling back to '{}'",
                        self.ranking_method,
                        RankingMethod::default()
                    ),
                };
                (RankingMethod::default(), vec![issue])
            }
        }
    }

    /// Warn when the post window cannot contain any post
    pub fn post_window_issues(&self) -> Vec<ConfigIssue> {
        match (self.start_post, self.end_post) {
            (Some(start), Some(end)) if start > end => vec![ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::EmptyPostWindow { start, end },
                message: format!(
                    "quest.start_post ({}) is after quest.end_post ({}); no posts will be counted",
                    start, end
                ),
            }],
            _ => vec![],
        }
    }

    pub fn post_filter(&self) -> PostFilter {
        PostFilter {
            start_post: self.start_post,
            end_post: self.end_post,
            excluded_authors: self.excluded_authors.clone(),
            excluded_posts: self.excluded_posts.clone(),
        }
    }

    /// Build tally settings, failing on an unknown partition mode.
    pub fn to_settings(&self) -> Result<TallySettings, DomainError> {
        let partition_mode = self.partition_mode.parse::<PartitionMode>()?;
        Ok(TallySettings::default()
            .with_partition_mode(partition_mode)
            .with_ranking_method(RankingMethod::from_name(&self.ranking_method))
            .with_proxy_votes(self.allow_proxy_votes)
            .with_forced_pinned_proxies(self.force_pinned_proxy_votes)
            .with_ignore_spoilers(self.ignore_spoilers)
            .with_task_filter(self.task_filter.clone())
            .with_custom_plans(self.custom_plans.clone())
            .with_post_filter(self.post_filter()))
    }
}
