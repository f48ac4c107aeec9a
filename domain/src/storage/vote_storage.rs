//! The vote → supporter map.
//!
//! Keys are reference keys: the submitted block with its marker cleared, so
//! every voter's copy of the same text lands on one entry. Each entry's
//! [`VoterStorage`] keeps what that voter actually submitted, marker included.

use super::voter_storage::VoterStorage;
use crate::core::agnostic;
use crate::vote::{IdentityType, MarkerType, Origin, VoteLineBlock};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// Share of user supporters one marker type needs to become a vote's category.
///
/// The comparison is strict: exactly 83% is not enough.
pub const CATEGORY_THRESHOLD: f64 = 0.83;

/// A stored vote with its category and supporters
#[derive(Debug, Clone, Copy)]
pub struct CategorizedVote<'a> {
    pub vote: &'a VoteLineBlock,
    pub category: MarkerType,
    pub supporters: &'a VoterStorage,
}

#[derive(Debug, Clone, Default)]
struct CategoryCache {
    /// Storage revision the categories were computed for
    revision: Option<u64>,
    categories: HashMap<VoteLineBlock, MarkerType>,
}

/// Every vote in the tally with its supporters
#[derive(Debug, Clone, Default)]
pub struct VoteStorage {
    votes: HashMap<VoteLineBlock, VoterStorage>,
    revision: u64,
    cache: RefCell<CategoryCache>,
}

impl VoteStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The storage key for a submitted block.
    pub fn reference_key(vote: &VoteLineBlock) -> VoteLineBlock {
        vote.to_reference_key()
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn contains(&self, vote: &VoteLineBlock) -> bool {
        self.votes.contains_key(&Self::reference_key(vote))
    }

    pub fn get(&self, vote: &VoteLineBlock) -> Option<&VoterStorage> {
        self.votes.get(&Self::reference_key(vote))
    }

    /// The key as stored, which may differ in case or markup from `vote`.
    fn stored_key(&self, key: &VoteLineBlock) -> Option<VoteLineBlock> {
        self.votes.get_key_value(key).map(|(k, _)| k.clone())
    }

    pub fn add_supporter_to_vote(&mut self, vote: &VoteLineBlock, origin: Origin) {
        let key = Self::reference_key(vote);
        self.votes.entry(key).or_default().insert(origin, vote.clone());
        self.touch();
    }

    pub fn remove_supporter_from_vote(&mut self, vote: &VoteLineBlock, origin: &Origin) -> bool {
        let removed = self
            .votes
            .get_mut(&Self::reference_key(vote))
            .and_then(|voters| voters.remove(origin))
            .is_some();
        if removed {
            self.touch();
        }
        removed
    }

    /// Remove a supporter from every vote.
    pub fn remove_voter_from_votes(&mut self, origin: &Origin) -> bool {
        let mut removed = false;
        for voters in self.votes.values_mut() {
            removed |= voters.remove(origin).is_some();
        }
        if removed {
            self.touch();
        }
        removed
    }

    /// Drop every vote nobody supports any more.
    pub fn remove_unsupported_votes(&mut self) -> bool {
        let before = self.votes.len();
        self.votes.retain(|_, voters| !voters.is_empty());
        let removed = self.votes.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    fn refresh_categories(&self) {
        let mut cache = self.cache.borrow_mut();
        if cache.revision == Some(self.revision) {
            return;
        }
        cache.categories = self
            .votes
            .iter()
            .map(|(vote, voters)| (vote.clone(), compute_category(voters)))
            .collect();
        cache.revision = Some(self.revision);
    }

    /// Category of a stored vote; `None` when absent or unsupported.
    pub fn category_of(&self, vote: &VoteLineBlock) -> MarkerType {
        self.refresh_categories();
        self.cache
            .borrow()
            .categories
            .get(&Self::reference_key(vote))
            .copied()
            .unwrap_or(MarkerType::None)
    }

    /// Every stored vote with its category, ordered by task then text.
    pub fn all_votes(&self) -> Vec<CategorizedVote<'_>> {
        self.refresh_categories();
        let cache = self.cache.borrow();
        let mut votes: Vec<CategorizedVote<'_>> = self
            .votes
            .iter()
            .map(|(vote, supporters)| CategorizedVote {
                vote,
                category: cache
                    .categories
                    .get(vote)
                    .copied()
                    .unwrap_or(MarkerType::None),
                supporters,
            })
            .collect();
        votes.sort_by(|a, b| display_order(a.vote, b.vote));
        votes
    }

    pub fn voters_for_vote(&self, vote: &VoteLineBlock) -> Vec<&Origin> {
        self.get(vote)
            .map(|voters| voters.origins().collect())
            .unwrap_or_default()
    }

    /// Reference keys of every vote the named supporter backs.
    pub fn votes_by_voter(&self, name: &str, identity: IdentityType) -> Vec<&VoteLineBlock> {
        let mut votes: Vec<&VoteLineBlock> = self
            .votes
            .iter()
            .filter(|(_, voters)| voters.find_by_name(name, identity).is_some())
            .map(|(vote, _)| vote)
            .collect();
        votes.sort_by(|a, b| display_order(a, b));
        votes
    }

    /// Votes filed under one task (agnostic match).
    pub fn votes_for_task(&self, task: &str) -> Vec<(&VoteLineBlock, &VoterStorage)> {
        let task_key = agnostic::normalize(task);
        let mut votes: Vec<(&VoteLineBlock, &VoterStorage)> = self
            .votes
            .iter()
            .filter(|(vote, _)| vote.task_key() == task_key)
            .collect();
        votes.sort_by(|a, b| display_order(a.0, b.0));
        votes
    }

    /// Distinct tasks in use, in agnostic order.
    pub fn tasks(&self) -> Vec<String> {
        let mut tasks: BTreeMap<&str, &str> = BTreeMap::new();
        for vote in self.votes.keys() {
            let spelling = tasks.entry(vote.task_key()).or_insert(vote.task());
            if vote.task() < *spelling {
                *spelling = vote.task();
            }
        }
        tasks.into_values().map(str::to_string).collect()
    }

    fn find_origin(&self, name: &str, identity: IdentityType) -> Option<Origin> {
        self.votes
            .values()
            .find_map(|voters| voters.find_by_name(name, identity))
            .cloned()
    }

    /// Move every supporter of `from` onto `to` and drop `from`.
    ///
    /// Moved supporters keep their own marker. Supporters already on `to`
    /// keep their existing entry. Returns false when the votes are the same
    /// or either one is missing.
    pub fn merge(&mut self, from: &VoteLineBlock, to: &VoteLineBlock) -> bool {
        let from_key = Self::reference_key(from);
        let to_key = Self::reference_key(to);
        if from_key == to_key {
            return false;
        }
        let Some(target_key) = self.stored_key(&to_key) else {
            return false;
        };
        let Some(from_voters) = self.votes.remove(&from_key) else {
            return false;
        };

        if let Some(target) = self.votes.get_mut(&to_key) {
            for (origin, submitted) in from_voters.iter() {
                if !target.contains(origin) {
                    target.insert(
                        origin.clone(),
                        target_key.with_marker(submitted.marker().clone()),
                    );
                }
            }
        }
        self.touch();
        true
    }

    /// Copy every supporter of `from` onto each target, then drop `from`.
    ///
    /// Targets that do not exist yet are created.
    pub fn split(&mut self, from: &VoteLineBlock, to: &[VoteLineBlock]) -> bool {
        let from_key = Self::reference_key(from);
        let Some(from_voters) = self.votes.get(&from_key).cloned() else {
            return false;
        };
        let targets: Vec<VoteLineBlock> = to
            .iter()
            .map(Self::reference_key)
            .filter(|target| *target != from_key)
            .collect();
        if targets.is_empty() {
            return false;
        }

        self.votes.remove(&from_key);
        for target in targets {
            let target_key = match self.stored_key(&target) {
                Some(key) => key,
                None => {
                    self.votes.insert(target.clone(), VoterStorage::new());
                    target
                }
            };
            if let Some(voters) = self.votes.get_mut(&target_key) {
                for (origin, submitted) in from_voters.iter() {
                    if !voters.contains(origin) {
                        voters.insert(
                            origin.clone(),
                            target_key.with_marker(submitted.marker().clone()),
                        );
                    }
                }
            }
        }
        self.touch();
        true
    }

    /// Re-target each named voter onto what `leader` currently supports.
    ///
    /// A voter loses support on every vote the leader does not back and gains
    /// support, with the leader's submission, on every vote the leader backs.
    pub fn join(&mut self, voters: &[String], leader: &str) -> bool {
        let leader_votes: Vec<(VoteLineBlock, VoteLineBlock)> = self
            .votes
            .iter()
            .filter_map(|(key, supporters)| {
                let origin = supporters.find_by_name(leader, IdentityType::User)?;
                let submitted = supporters.get(origin)?;
                Some((key.clone(), submitted.clone()))
            })
            .collect();
        if leader_votes.is_empty() {
            return false;
        }

        let mut changed = false;
        for name in voters {
            if agnostic::agnostic_eq(name, leader) {
                continue;
            }
            let Some(origin) = self.find_origin(name, IdentityType::User) else {
                continue;
            };

            for (key, supporters) in self.votes.iter_mut() {
                let led = leader_votes.iter().any(|(leader_key, _)| leader_key == key);
                if !led && supporters.remove(&origin).is_some() {
                    changed = true;
                }
            }
            for (key, submitted) in &leader_votes {
                if let Some(supporters) = self.votes.get_mut(key) {
                    if !supporters.contains(&origin) {
                        supporters.insert(origin.clone(), submitted.clone());
                        changed = true;
                    }
                }
            }
        }

        if changed {
            self.votes.retain(|_, supporters| !supporters.is_empty());
            self.touch();
        }
        changed
    }

    pub fn delete(&mut self, vote: &VoteLineBlock) -> bool {
        let removed = self.votes.remove(&Self::reference_key(vote)).is_some();
        if removed {
            self.touch();
        }
        removed
    }

    /// Rename a vote's task, folding its supporters into an existing vote
    /// that already carries the new task.
    pub fn replace_task(&mut self, vote: &VoteLineBlock, task: &str) -> bool {
        let key = Self::reference_key(vote);
        let Some((stored, voters)) = self.votes.remove_entry(&key) else {
            return false;
        };
        let renamed = stored.with_task(task);
        if renamed.to_string() == stored.to_string() {
            self.votes.insert(stored, voters);
            return false;
        }

        let retasked: Vec<(Origin, VoteLineBlock)> = voters
            .iter()
            .map(|(origin, submitted)| (origin.clone(), submitted.with_task(task)))
            .collect();
        match self.votes.get_mut(&renamed) {
            Some(existing) => {
                for (origin, submitted) in retasked {
                    if !existing.contains(&origin) {
                        existing.insert(origin, submitted);
                    }
                }
            }
            None => {
                self.votes.insert(renamed, retasked.into_iter().collect());
            }
        }
        self.touch();
        true
    }

    /// Reconcile this storage with an earlier snapshot.
    ///
    /// First every key and supporter absent from (or rendered differently in)
    /// the snapshot is removed, then everything the snapshot has that is now
    /// missing is put back.
    pub fn restore_from(&mut self, snapshot: &VoteStorage) {
        let keys: Vec<VoteLineBlock> = self.votes.keys().cloned().collect();
        for key in keys {
            match snapshot.votes.get_key_value(&key) {
                Some((snapshot_key, snapshot_voters))
                    if snapshot_key.to_string() == key.to_string() =>
                {
                    if let Some(voters) = self.votes.get_mut(&key) {
                        let stale: Vec<Origin> = voters
                            .iter()
                            .filter(|(origin, submitted)| {
                                snapshot_voters.rendered(origin) != Some(submitted.to_string())
                            })
                            .map(|(origin, _)| origin.clone())
                            .collect();
                        for origin in stale {
                            voters.remove(&origin);
                        }
                    }
                }
                _ => {
                    self.votes.remove(&key);
                }
            }
        }

        for (snapshot_key, snapshot_voters) in &snapshot.votes {
            match self.votes.get_mut(snapshot_key) {
                Some(voters) => {
                    for (origin, submitted) in snapshot_voters.iter() {
                        if !voters.contains(origin) {
                            voters.insert(origin.clone(), submitted.clone());
                        }
                    }
                }
                None => {
                    self.votes.insert(snapshot_key.clone(), snapshot_voters.clone());
                }
            }
        }
        self.touch();
    }

    /// Every key with every supporter's rendered submission, for comparisons.
    pub fn rendered(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.votes
            .iter()
            .map(|(key, voters)| {
                let supporters = voters
                    .iter()
                    .map(|(origin, submitted)| {
                        (format!("{:?}:{}", origin.identity(), origin.author()), submitted.to_string())
                    })
                    .collect();
                (key.to_string(), supporters)
            })
            .collect()
    }
}

fn display_order(a: &VoteLineBlock, b: &VoteLineBlock) -> std::cmp::Ordering {
    (a.task_key(), a.clean_text().to_lowercase(), a.to_string())
        .cmp(&(b.task_key(), b.clean_text().to_lowercase(), b.to_string()))
}

/// Majority marker type among a vote's user supporters.
fn compute_category(voters: &VoterStorage) -> MarkerType {
    let mut counts: BTreeMap<MarkerType, usize> = BTreeMap::new();
    let mut total = 0usize;
    for (_, submitted) in voters.iter().filter(|(origin, _)| origin.is_user()) {
        *counts.entry(submitted.marker_type()).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return MarkerType::None;
    }
    counts
        .into_iter()
        .find(|(_, count)| *count as f64 / total as f64 > CATEGORY_THRESHOLD)
        .map_or(MarkerType::Vote, |(kind, _)| kind)
}
