//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use tally_domain::OutputFormat;

// Re-export OutputFormat from domain for convenience
pub use tally_domain::OutputFormat as FileOutputFormat;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format (uses domain type)
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
    /// Show supporter names under each vote
    pub show_supporters: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            show_supporters: true,
        }
    }
}
