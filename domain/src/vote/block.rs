//! Vote blocks: one or more lines counted as a single unit.

use super::line::VoteLine;
use super::marker::{Marker, MarkerType};
use crate::core::error::DomainError;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// An ordered, non-empty run of vote lines counted as one vote
///
/// The block's marker and task are those of its first line. Two blocks are
/// equal when their lines are pairwise equal and their marker types are
/// compatible; a block with no marker therefore matches any voter's marked
/// copy of the same text.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct VoteLineBlock {
    lines: Vec<VoteLine>,
}

impl VoteLineBlock {
    pub fn new(lines: Vec<VoteLine>) -> Result<Self, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::EmptyBlock);
        }
        Ok(Self { lines })
    }

    pub fn from_line(line: VoteLine) -> Self {
        Self { lines: vec![line] }
    }

    pub fn lines(&self) -> &[VoteLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<VoteLine> {
        self.lines
    }

    pub fn first(&self) -> &VoteLine {
        &self.lines[0]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn marker(&self) -> &Marker {
        self.first().marker()
    }

    pub fn marker_type(&self) -> MarkerType {
        self.first().marker_type()
    }

    pub fn marker_value(&self) -> u8 {
        self.first().marker_value()
    }

    pub fn task(&self) -> &str {
        self.first().task()
    }

    pub(crate) fn task_key(&self) -> &str {
        self.first().task_key()
    }

    /// Shallowest depth among the lines
    pub fn min_depth(&self) -> usize {
        self.lines.iter().map(VoteLine::depth).min().unwrap_or(0)
    }

    /// Re-mark every line.
    pub fn with_marker(&self, marker: Marker) -> Self {
        Self {
            lines: self
                .lines
                .iter()
                .map(|line| line.with_marker(marker.clone()))
                .collect(),
        }
    }

    /// Re-task the block (its first line).
    pub fn with_task(&self, task: impl Into<String>) -> Self {
        let mut lines = self.lines.clone();
        lines[0] = lines[0].with_task(task);
        Self { lines }
    }

    /// Shift every line so the shallowest sits at depth 0.
    pub fn rerooted(&self) -> Self {
        let min = self.min_depth();
        Self {
            lines: self
                .lines
                .iter()
                .map(|line| line.with_depth(line.depth() - min))
                .collect(),
        }
    }

    /// The content-addressed storage key: same lines, no marker.
    pub fn to_reference_key(&self) -> Self {
        self.with_marker(Marker::none())
    }

    /// Clean content of every line, joined by newlines
    pub fn clean_text(&self) -> String {
        self.lines
            .iter()
            .map(VoteLine::clean_content)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl PartialEq for VoteLineBlock {
    fn eq(&self, other: &Self) -> bool {
        self.lines == other.lines && self.marker_type().is_compatible_with(other.marker_type())
    }
}

impl Eq for VoteLineBlock {}

impl Hash for VoteLineBlock {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self.lines.iter().fold(0u64, |acc, line| {
            let mut hasher = DefaultHasher::new();
            line.hash(&mut hasher);
            acc ^ hasher.finish()
        });
        state.write_u64(combined);
    }
}

impl std::fmt::Display for VoteLineBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}
