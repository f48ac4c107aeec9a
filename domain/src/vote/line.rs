//! A single parsed vote line.

use super::marker::{Marker, MarkerType};
use super::markup::{normalize_markup, strip_markup};
use crate::core::agnostic;
use serde::Serialize;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Characters that count as one level of nesting in a line prefix
pub const DEPTH_CHARS: [char; 3] = ['-', '–', '—'];

/// One parsed vote line
///
/// Equality, ordering and hashing use the agnostic task and clean content,
/// with depth as the tie-breaker. Markers never take part, so `[x] Wall` and
/// `[1] Wall` are the same line.
#[derive(Debug, Clone, Serialize)]
pub struct VoteLine {
    prefix: String,
    marker: Marker,
    task: String,
    content: String,
    clean_content: String,
    #[serde(skip)]
    task_key: String,
    #[serde(skip)]
    content_key: String,
}

impl VoteLine {
    /// Build a line from its parts.
    ///
    /// `prefix` keeps only depth characters; `content` has its markup
    /// balanced.
    pub fn new(
        prefix: impl AsRef<str>,
        marker: Marker,
        task: impl Into<String>,
        content: impl AsRef<str>,
    ) -> Self {
        let prefix: String = prefix
            .as_ref()
            .chars()
            .filter(|c| DEPTH_CHARS.contains(c))
            .collect();
        let task = task.into().trim().to_string();
        let content = normalize_markup(content.as_ref());
        let clean_content = strip_markup(&content).trim().to_string();

        Self {
            prefix,
            marker,
            task_key: agnostic::normalize(&task),
            content_key: agnostic::normalize(&clean_content),
            task,
            content,
            clean_content,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Nesting depth (number of prefix characters)
    pub fn depth(&self) -> usize {
        self.prefix.chars().count()
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn marker_type(&self) -> MarkerType {
        self.marker.kind()
    }

    pub fn marker_value(&self) -> u8 {
        self.marker.value()
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    /// Content with inline markup preserved
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content with markup removed
    pub fn clean_content(&self) -> &str {
        &self.clean_content
    }

    pub(crate) fn task_key(&self) -> &str {
        &self.task_key
    }

    pub fn with_depth(&self, depth: usize) -> Self {
        Self {
            prefix: "-".repeat(depth),
            ..self.clone()
        }
    }

    pub fn with_marker(&self, marker: Marker) -> Self {
        Self {
            marker,
            ..self.clone()
        }
    }

    pub fn with_task(&self, task: impl Into<String>) -> Self {
        let task = task.into().trim().to_string();
        Self {
            task_key: agnostic::normalize(&task),
            task,
            ..self.clone()
        }
    }

    pub fn with_content(&self, content: impl AsRef<str>) -> Self {
        Self::new(&self.prefix, self.marker.clone(), self.task.clone(), content)
    }

    fn sort_key(&self) -> (&str, &str, usize) {
        (&self.task_key, &self.content_key, self.depth())
    }
}

impl PartialEq for VoteLine {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for VoteLine {}

impl Hash for VoteLine {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl PartialOrd for VoteLine {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VoteLine {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl std::fmt::Display for VoteLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix, self.marker)?;
        if !self.task.is_empty() {
            write!(f, "[{}]", self.task)?;
        }
        write!(f, " {}", self.content)
    }
}
