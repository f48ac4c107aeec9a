//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;
use tally_domain::{OutputFormat, PartitionMode, RankingMethod};

/// CLI arguments for quest-tally
#[derive(Parser, Debug)]
#[command(name = "quest-tally")]
#[command(author, version, about = "Tally forum quest votes from thread dumps")]
#[command(long_about = r#"
quest-tally reads a forum quest thread and counts the votes in it.

Each post's vote lines ("[x] Build the wall", "-[1][Tactics] Flank left")
are parsed, references to other voters and to named plans are replaced by
the votes they point at, and the result is grouped by task. Tasks voted on
with ranks ([1], [2], ...) are also ranked.

Configuration files are loaded from (in priority order):
1. --config <path>            Explicit config file
2. ./tally.toml               Project-level config
3. ~/.config/quest-tally/config.toml   Global config

Example:
  quest-tally thread.json
  quest-tally --partition block_all --ranking borda page1.json page2.json
  quest-tally -o json --task Army --task Build thread.json
"#)]
pub struct Cli {
    /// Thread dump files (JSON), read together
    #[arg(value_name = "POSTS", required_unless_present = "show_config")]
    pub posts: Vec<PathBuf>,

    /// Thread address for dumps that do not name one
    #[arg(long, value_name = "URI")]
    pub thread: Option<String>,

    /// Partition mode: none, line, line_task, block, block_all
    #[arg(short, long, value_name = "MODE")]
    pub partition: Option<PartitionMode>,

    /// Ranking method: schulze, baldwin, borda, instant_runoff, wilson
    #[arg(short, long, value_name = "METHOD")]
    pub ranking: Option<RankingMethod>,

    /// Only count these tasks (can be specified multiple times)
    #[arg(short, long, value_name = "TASK")]
    pub task: Vec<String>,

    /// Do not resolve references to other voters
    #[arg(long)]
    pub no_proxy: bool,

    /// Output format: text or json
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Hide supporter names under each vote
    #[arg(long)]
    pub no_supporters: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory for a daily rolling diagnostic log
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Write a JSONL record of every tally event to this file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
