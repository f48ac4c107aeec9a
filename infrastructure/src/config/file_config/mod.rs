//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod output;
mod quest;

pub use output::{FileOutputConfig, FileOutputFormat};
pub use quest::FileQuestConfig;

use serde::{Deserialize, Serialize};
use tally_domain::config::validation::ConfigIssue;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// How votes are read and counted
    pub quest: FileQuestConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// It checks:
    /// 1. Enum parse failures (partition_mode is an error, ranking_method a warning)
    /// 2. A post window that cannot contain any post
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.quest.parse_partition_mode().1);
        issues.extend(self.quest.parse_ranking_method().1);
        issues.extend(self.quest.post_window_issues());

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_domain::{OutputFormat, PartitionMode};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[quest]
partition_mode = "block_all"
force_pinned_proxy_votes = true

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.quest.partition_mode, "block_all");
        assert!(config.quest.force_pinned_proxy_votes);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[quest]
partition_mode = "line"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let settings = config.quest.to_settings().unwrap();
        assert_eq!(settings.partition_mode, PartitionMode::ByLine);
        // Defaults should apply
        assert!(config.quest.allow_proxy_votes);
        assert!(config.output.format.is_none());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let toml_str = r#"
[quest]
partition_mode = "sentence"
ranking_method = "dice"
start_post = 9
end_post = 3
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 1);
    }
}
