//! Supporter storage: which origins back which votes.
//!
//! - [`VoteStorage`]: reference key → [`VoterStorage`], with lazily cached
//!   categories and the merge/split/join/delete/replace-task edits
//! - [`SupporterStorage`]: the same edits with multi-level undo

pub mod supporter_storage;
pub mod undo;
pub mod vote_storage;
pub mod voter_storage;

pub use supporter_storage::SupporterStorage;
pub use undo::{UndoAction, UndoKind, UndoStack};
pub use vote_storage::{CATEGORY_THRESHOLD, CategorizedVote, VoteStorage};
pub use voter_storage::VoterStorage;
