//! Partition mode selection.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How a post's vote is split into independently counted blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PartitionMode {
    /// The whole vote is one block
    #[serde(rename = "none")]
    None,
    /// Every line is its own block
    #[serde(rename = "line")]
    ByLine,
    /// Every line is its own block, inheriting tasks from its parents
    #[serde(rename = "line_task")]
    ByLineTask,
    /// A new block starts at each top-level line (default)
    #[default]
    #[serde(rename = "block")]
    ByBlock,
    /// As `ByBlock`, also splitting plan bodies into their own blocks
    #[serde(rename = "block_all")]
    ByBlockAll,
}

impl PartitionMode {
    pub const ALL: [PartitionMode; 5] = [
        PartitionMode::None,
        PartitionMode::ByLine,
        PartitionMode::ByLineTask,
        PartitionMode::ByBlock,
        PartitionMode::ByBlockAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionMode::None => "none",
            PartitionMode::ByLine => "line",
            PartitionMode::ByLineTask => "line_task",
            PartitionMode::ByBlock => "block",
            PartitionMode::ByBlockAll => "block_all",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PartitionMode::None => "whole post as one vote",
            PartitionMode::ByLine => "each line separately",
            PartitionMode::ByLineTask => "each line separately, tasks cascade to sub-lines",
            PartitionMode::ByBlock => "each top-level block",
            PartitionMode::ByBlockAll => "each top-level block, plan bodies split into blocks",
        }
    }
}

impl std::fmt::Display for PartitionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PartitionMode {
    type Err = DomainError;

    /// Accepts the canonical names plus `by_` prefixed and dashed spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        let name = normalized.strip_prefix("by_").unwrap_or(&normalized);
        match name {
            "none" | "whole" => Ok(PartitionMode::None),
            "line" => Ok(PartitionMode::ByLine),
            "line_task" | "linetask" => Ok(PartitionMode::ByLineTask),
            "block" => Ok(PartitionMode::ByBlock),
            "block_all" | "blockall" => Ok(PartitionMode::ByBlockAll),
            _ => Err(DomainError::UnknownPartitionMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_block() {
        assert_eq!(PartitionMode::default(), PartitionMode::ByBlock);
    }

    #[test]
    fn test_from_str_round_trips_display() {
        for mode in PartitionMode::ALL {
            assert_eq!(mode.to_string().parse::<PartitionMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("by-line".parse::<PartitionMode>().unwrap(), PartitionMode::ByLine);
        assert_eq!("BY_BLOCK_ALL".parse::<PartitionMode>().unwrap(), PartitionMode::ByBlockAll);
        assert_eq!("whole".parse::<PartitionMode>().unwrap(), PartitionMode::None);
    }

    #[test]
    fn test_unknown_mode_fails() {
        let err = "by_paragraph".parse::<PartitionMode>().unwrap_err();
        assert_eq!(err, DomainError::UnknownPartitionMode("by_paragraph".to_string()));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PartitionMode::ByLineTask).unwrap();
        assert_eq!(json, "\"line_task\"");
        let mode: PartitionMode = serde_json::from_str("\"block_all\"").unwrap();
        assert_eq!(mode, PartitionMode::ByBlockAll);
    }
}
