//! Vote storage with undoable edits.

use super::undo::{UndoAction, UndoKind, UndoStack};
use super::vote_storage::VoteStorage;
use crate::vote::VoteLineBlock;

/// [`VoteStorage`] plus an undo history for interactive edits
///
/// Merge, split, join, delete and task replacement push a snapshot before
/// running and drop it again if the edit changed nothing, so the history
/// only holds edits that happened. Supporter additions and removals made
/// while counting posts are not recorded.
#[derive(Debug, Clone, Default)]
pub struct SupporterStorage {
    votes: VoteStorage,
    undo: UndoStack,
}

impl SupporterStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn votes(&self) -> &VoteStorage {
        &self.votes
    }

    /// Direct access for counting; changes made here bypass undo.
    pub fn votes_mut(&mut self) -> &mut VoteStorage {
        &mut self.votes
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn last_undo_kind(&self) -> Option<UndoKind> {
        self.undo.peek_kind()
    }

    fn undoable(&mut self, kind: UndoKind, edit: impl FnOnce(&mut VoteStorage) -> bool) -> bool {
        self.undo.push(UndoAction::new(kind, &self.votes));
        let changed = edit(&mut self.votes);
        if !changed {
            self.undo.pop();
        }
        changed
    }

    pub fn merge(&mut self, from: &VoteLineBlock, to: &VoteLineBlock) -> bool {
        self.undoable(UndoKind::Merge, |votes| votes.merge(from, to))
    }

    pub fn split(&mut self, from: &VoteLineBlock, to: &[VoteLineBlock]) -> bool {
        self.undoable(UndoKind::Split, |votes| votes.split(from, to))
    }

    pub fn join(&mut self, voters: &[String], leader: &str) -> bool {
        self.undoable(UndoKind::Join, |votes| votes.join(voters, leader))
    }

    pub fn delete(&mut self, vote: &VoteLineBlock) -> bool {
        self.undoable(UndoKind::Delete, |votes| votes.delete(vote))
    }

    pub fn replace_task(&mut self, vote: &VoteLineBlock, task: &str) -> bool {
        self.undoable(UndoKind::Other, |votes| votes.replace_task(vote, task))
    }

    /// Reverse the most recent edit. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(mut action) => action.apply(&mut self.votes),
            None => false,
        }
    }

    /// Forget all edits, e.g. after a fresh tally.
    pub fn clear_history(&mut self) {
        self.undo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vote::{MarkerType, Origin, parse_lines};

    fn vote(text: &str) -> VoteLineBlock {
        VoteLineBlock::new(parse_lines(text)).unwrap()
    }

    fn seeded() -> SupporterStorage {
        let mut storage = SupporterStorage::new();
        let votes = storage.votes_mut();
        votes.add_supporter_to_vote(&vote("[1] Wall"), Origin::new("Alice", 1, 1));
        votes.add_supporter_to_vote(&vote("[x] Walls"), Origin::new("Bob", 2, 2));
        votes.add_supporter_to_vote(&vote("[x] Moat"), Origin::new("Bob", 2, 2));
        votes.add_supporter_to_vote(&vote("[+] Tower"), Origin::new("Carol", 3, 3));
        storage
    }

    #[test]
    fn test_no_op_edits_leave_no_history() {
        let mut storage = seeded();
        assert!(!storage.merge(&vote("[x] Wall"), &vote("[x] Wall")));
        assert!(!storage.merge(&vote("[x] Missing"), &vote("[x] Wall")));
        assert!(!storage.split(&vote("[x] Missing"), &[vote("[x] Wall")]));
        assert!(!storage.join(&["Alice".to_string()], "Nobody"));
        assert!(!storage.delete(&vote("[x] Missing")));
        assert!(!storage.replace_task(&vote("[x] Missing"), "Build"));
        assert_eq!(storage.undo_depth(), 0);
        assert!(!storage.undo());
    }

    fn assert_undoes(kind: UndoKind, edit: impl Fn(&mut SupporterStorage) -> bool) {
        let mut storage = seeded();
        let before = storage.votes().rendered();
        assert!(edit(&mut storage), "{kind:?} should change storage");
        assert_ne!(storage.votes().rendered(), before);
        assert_eq!(storage.last_undo_kind(), Some(kind));
        assert!(storage.undo());
        assert_eq!(storage.votes().rendered(), before, "{kind:?} undo");
        assert_eq!(storage.undo_depth(), 0);
    }

    #[test]
    fn test_each_edit_undoes_exactly() {
        assert_undoes(UndoKind::Merge, |s| {
            s.merge(&vote("[x] Wall"), &vote("[x] Walls"))
        });
        assert_undoes(UndoKind::Split, |s| {
            s.split(&vote("[x] Walls"), &[vote("[x] Wall"), vote("[x] Gate")])
        });
        assert_undoes(UndoKind::Join, |s| s.join(&["Carol".to_string()], "Bob"));
        assert_undoes(UndoKind::Delete, |s| s.delete(&vote("[x] Moat")));
        assert_undoes(UndoKind::Other, |s| {
            s.replace_task(&vote("[x] Tower"), "Defense")
        });
    }

    #[test]
    fn test_multi_level_undo() {
        let mut storage = seeded();
        let initial = storage.votes().rendered();
        assert!(storage.merge(&vote("[x] Wall"), &vote("[x] Walls")));
        let after_merge = storage.votes().rendered();
        assert!(storage.delete(&vote("[x] Moat")));

        assert!(storage.undo());
        assert_eq!(storage.votes().rendered(), after_merge);
        assert!(storage.undo());
        assert_eq!(storage.votes().rendered(), initial);
        assert!(!storage.undo());
    }

    #[test]
    fn test_undo_restores_categories() {
        let mut storage = seeded();
        assert!(storage.merge(&vote("[x] Wall"), &vote("[x] Walls")));
        assert!(storage.undo());
        assert_eq!(storage.votes().category_of(&vote("[x] Wall")), MarkerType::Rank);
    }
}
