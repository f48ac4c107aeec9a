//! Snapshot-based undo for storage edits.

use super::vote_storage::VoteStorage;
use serde::{Deserialize, Serialize};

/// Which edit an undo entry reverses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndoKind {
    Merge,
    Split,
    Join,
    Delete,
    Other,
}

/// A full copy of storage taken before an edit
///
/// An action can be applied once; afterwards it holds nothing.
#[derive(Debug, Clone)]
pub struct UndoAction {
    kind: UndoKind,
    snapshot: Option<VoteStorage>,
}

impl UndoAction {
    pub fn new(kind: UndoKind, before: &VoteStorage) -> Self {
        Self {
            kind,
            snapshot: Some(before.clone()),
        }
    }

    pub fn kind(&self) -> UndoKind {
        self.kind
    }

    pub fn is_spent(&self) -> bool {
        self.snapshot.is_none()
    }

    /// Reconcile `storage` with the snapshot. Returns false if already used.
    pub fn apply(&mut self, storage: &mut VoteStorage) -> bool {
        match self.snapshot.take() {
            Some(snapshot) => {
                storage.restore_from(&snapshot);
                true
            }
            None => false,
        }
    }
}

/// Most recent edit last
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    actions: Vec<UndoAction>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: UndoAction) {
        self.actions.push(action);
    }

    pub fn pop(&mut self) -> Option<UndoAction> {
        self.actions.pop()
    }

    pub fn peek_kind(&self) -> Option<UndoKind> {
        self.actions.last().map(UndoAction::kind)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vote::{Origin, VoteLineBlock, parse_line};

    fn vote(text: &str) -> VoteLineBlock {
        VoteLineBlock::from_line(parse_line(text).unwrap())
    }

    #[test]
    fn test_action_is_single_use() {
        let mut storage = VoteStorage::new();
        storage.add_supporter_to_vote(&vote("[x] Wall"), Origin::new("Alice", 1, 1));
        let mut action = UndoAction::new(UndoKind::Delete, &storage);
        storage.delete(&vote("[x] Wall"));

        assert!(action.apply(&mut storage));
        assert!(storage.contains(&vote("[x] Wall")));
        assert!(action.is_spent());

        storage.delete(&vote("[x] Wall"));
        assert!(!action.apply(&mut storage));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_stack_order() {
        let storage = VoteStorage::new();
        let mut stack = UndoStack::new();
        stack.push(UndoAction::new(UndoKind::Merge, &storage));
        stack.push(UndoAction::new(UndoKind::Split, &storage));
        assert_eq!(stack.peek_kind(), Some(UndoKind::Split));
        assert_eq!(stack.pop().map(|a| a.kind()), Some(UndoKind::Split));
        assert_eq!(stack.len(), 1);
    }
}
