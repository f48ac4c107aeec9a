//! Per-vote map of supporters to what each of them submitted.

use crate::core::agnostic;
use crate::vote::{IdentityType, Origin, VoteLineBlock};
use std::collections::{BTreeMap, HashMap};

/// Supporters of one vote, each with the block they actually submitted
///
/// The submitted block keeps the supporter's own marker. A name index is kept
/// in step with the map on every insert and remove.
#[derive(Debug, Clone, Default)]
pub struct VoterStorage {
    voters: BTreeMap<Origin, VoteLineBlock>,
    by_name: HashMap<(IdentityType, String), Origin>,
}

impl VoterStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a supporter's submission.
    ///
    /// The stored origin is refreshed so its post metadata is the latest.
    pub fn insert(&mut self, origin: Origin, vote: VoteLineBlock) -> Option<VoteLineBlock> {
        let previous = self.voters.remove(&origin);
        self.by_name.insert(
            (origin.identity(), origin.author_key().to_string()),
            origin.clone(),
        );
        self.voters.insert(origin, vote);
        previous
    }

    pub fn remove(&mut self, origin: &Origin) -> Option<VoteLineBlock> {
        let removed = self.voters.remove(origin)?;
        self.by_name
            .remove(&(origin.identity(), origin.author_key().to_string()));
        Some(removed)
    }

    pub fn get(&self, origin: &Origin) -> Option<&VoteLineBlock> {
        self.voters.get(origin)
    }

    pub fn contains(&self, origin: &Origin) -> bool {
        self.voters.contains_key(origin)
    }

    /// Look a supporter up by name.
    pub fn find_by_name(&self, name: &str, identity: IdentityType) -> Option<&Origin> {
        self.by_name.get(&(identity, agnostic::normalize(name)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Origin, &VoteLineBlock)> {
        self.voters.iter()
    }

    pub fn origins(&self) -> impl Iterator<Item = &Origin> {
        self.voters.keys()
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    /// Number of supporters that are people rather than plans
    pub fn user_count(&self) -> usize {
        self.voters.keys().filter(|o| o.is_user()).count()
    }

    /// The exact submission rendering of one supporter, for change detection.
    pub(crate) fn rendered(&self, origin: &Origin) -> Option<String> {
        self.voters.get(origin).map(ToString::to_string)
    }

    #[cfg(test)]
    pub(crate) fn index_len(&self) -> usize {
        self.by_name.len()
    }
}

impl FromIterator<(Origin, VoteLineBlock)> for VoterStorage {
    fn from_iter<T: IntoIterator<Item = (Origin, VoteLineBlock)>>(iter: T) -> Self {
        let mut storage = Self::new();
        for (origin, vote) in iter {
            storage.insert(origin, vote);
        }
        storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vote::parse_line;

    fn vote(text: &str) -> VoteLineBlock {
        VoteLineBlock::from_line(parse_line(text).unwrap())
    }

    #[test]
    fn test_insert_and_find_by_name() {
        let mut storage = VoterStorage::new();
        storage.insert(Origin::new("Alice", 1, 1), vote("[x] Wall"));
        assert!(storage.find_by_name("alice", IdentityType::User).is_some());
        assert!(storage.find_by_name("alice", IdentityType::Plan).is_none());
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_reinsert_refreshes_origin_metadata() {
        let mut storage = VoterStorage::new();
        storage.insert(Origin::new("Alice", 1, 1), vote("[x] Wall"));
        let previous = storage.insert(Origin::new("Alice", 9, 4), vote("[1] Wall"));
        assert!(previous.is_some());
        assert_eq!(storage.len(), 1);
        let origin = storage.origins().next().unwrap();
        assert_eq!(origin.post_id(), 9);
        assert_eq!(
            storage.find_by_name("Alice", IdentityType::User).unwrap().post_id(),
            9
        );
    }

    #[test]
    fn test_remove_keeps_index_in_sync() {
        let mut storage: VoterStorage = [
            (Origin::new("Alice", 1, 1), vote("[x] Wall")),
            (Origin::new("Bob", 2, 2), vote("[x] Wall")),
        ]
        .into_iter()
        .collect();
        assert_eq!(storage.index_len(), 2);
        assert!(storage.remove(&Origin::new("alice", 0, 0)).is_some());
        assert!(storage.remove(&Origin::new("alice", 0, 0)).is_none());
        assert_eq!(storage.index_len(), 1);
        assert!(storage.find_by_name("Alice", IdentityType::User).is_none());
    }

    #[test]
    fn test_user_count_excludes_plans() {
        let alice = Origin::new("Alice", 1, 1);
        let plan = Origin::plan("Raid", &alice);
        let storage: VoterStorage = [(alice, vote("[x] Wall")), (plan, vote("[x] Wall"))]
            .into_iter()
            .collect();
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.user_count(), 1);
    }
}
