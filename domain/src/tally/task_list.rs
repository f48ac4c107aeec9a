//! Ordered list of tasks seen in a tally.

use crate::core::agnostic;
use serde::Serialize;

/// Tasks in display order
///
/// Tasks are recorded in order of first appearance and compared agnostically.
/// The empty task (untasked votes) is never listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<String>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, task: &str) -> Option<usize> {
        let key = agnostic::normalize(task);
        self.tasks.iter().position(|t| agnostic::normalize(t) == key)
    }

    pub fn contains(&self, task: &str) -> bool {
        self.position(task).is_some()
    }

    /// Append a task unless it is empty or already listed.
    pub fn add(&mut self, task: &str) -> bool {
        let task = task.trim();
        if task.is_empty() || self.contains(task) {
            return false;
        }
        self.tasks.push(task.to_string());
        true
    }

    /// Insert a task at `index` (clamped to the end).
    pub fn insert(&mut self, index: usize, task: &str) -> bool {
        let task = task.trim();
        if task.is_empty() || self.contains(task) {
            return false;
        }
        let index = index.min(self.tasks.len());
        self.tasks.insert(index, task.to_string());
        true
    }

    pub fn remove(&mut self, task: &str) -> bool {
        match self.position(task) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn move_up(&mut self, task: &str) -> bool {
        match self.position(task) {
            Some(index) if index > 0 => {
                self.tasks.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    pub fn move_down(&mut self, task: &str) -> bool {
        match self.position(task) {
            Some(index) if index + 1 < self.tasks.len() => {
                self.tasks.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Rename in place. Fails if `new` is already another listed task.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let new = new.trim();
        let Some(index) = self.position(old) else {
            return false;
        };
        if new.is_empty() || self.position(new).is_some_and(|other| other != index) {
            return false;
        }
        self.tasks[index] = new.to_string();
        true
    }

    /// Sort tasks by their agnostic form.
    pub fn alphabetize(&mut self) {
        self.tasks.sort_by_cached_key(|t| agnostic::normalize(t));
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(tasks: &[&str]) -> TaskList {
        let mut list = TaskList::new();
        for task in tasks {
            list.add(task);
        }
        list
    }

    #[test]
    fn test_add_keeps_first_spelling_once() {
        let mut tasks = list(&["Build", "Tactics"]);
        assert!(!tasks.add("build"));
        assert!(!tasks.add(""));
        assert_eq!(tasks.as_slice(), ["Build", "Tactics"]);
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut tasks = list(&["Build"]);
        assert!(tasks.insert(0, "Scouting"));
        assert!(tasks.insert(99, "Trade"));
        assert_eq!(tasks.as_slice(), ["Scouting", "Build", "Trade"]);
    }

    #[test]
    fn test_reorder() {
        let mut tasks = list(&["A", "B", "C"]);
        assert!(tasks.move_up("c"));
        assert!(!tasks.move_up("A"));
        assert!(tasks.move_down("A"));
        assert!(!tasks.move_down("B"));
        assert_eq!(tasks.as_slice(), ["C", "A", "B"]);
    }

    #[test]
    fn test_rename() {
        let mut tasks = list(&["Build", "Tactics"]);
        assert!(tasks.rename("build", "Construction"));
        assert!(!tasks.rename("Construction", "tactics"));
        assert!(tasks.rename("Tactics", "TACTICS"));
        assert!(!tasks.rename("Missing", "X"));
        assert_eq!(tasks.as_slice(), ["Construction", "TACTICS"]);
    }

    #[test]
    fn test_alphabetize_and_remove() {
        let mut tasks = list(&["tactics", "Build", "army"]);
        tasks.alphabetize();
        assert_eq!(tasks.as_slice(), ["army", "Build", "tactics"]);
        assert!(tasks.remove("BUILD"));
        assert!(!tasks.remove("BUILD"));
        assert_eq!(tasks.len(), 2);
    }
}
