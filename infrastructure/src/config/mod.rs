//! Configuration file loading for quest-tally
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `QUEST_TALLY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./tally.toml` or `./.tally.toml`
//! 4. Global: `$XDG_CONFIG_HOME/quest-tally/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileConfig, FileOutputConfig, FileOutputFormat, FileQuestConfig};
pub use loader::ConfigLoader;
