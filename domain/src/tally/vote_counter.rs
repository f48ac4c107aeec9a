//! Counting posts into supporter storage.
//!
//! The counter is synchronous and processes one post at a time. Callers
//! decide the order and when to force deferred posts; see
//! [`VoteCounter::process_post`].

use super::plan_registry::{PlanRegistration, PlanRegistry};
use super::post::{Post, PostState};
use super::task_list::TaskList;
use crate::config::TallySettings;
use crate::core::agnostic;
use crate::partition::{
    WorkingVote, WorkingVoteResult, configure_working_vote, find_declarations, partition,
};
use crate::ranking::RankedVote;
use crate::reference::{ReferenceLookup, ResolveContext, UserVote};
use crate::storage::SupporterStorage;
use crate::vote::{MarkerType, Origin, VoteLineBlock};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Why a post did not contribute a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No vote lines
    NoVote,
    /// A previously posted tally
    TallyReport,
    /// Excluded by the post filter
    Filtered,
    /// The author already has a later post counted
    Superseded,
    /// Already handled
    AlreadyProcessed,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoVote => "no_vote",
            SkipReason::TallyReport => "tally_report",
            SkipReason::Filtered => "filtered",
            SkipReason::Superseded => "superseded",
            SkipReason::AlreadyProcessed => "already_processed",
        }
    }
}

/// What happened to one post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    /// The post's vote was added as this many blocks
    Counted { blocks: usize },
    /// A referenced vote is still pending; try again later
    Deferred,
    Skipped(SkipReason),
}

/// Running totals for a tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TallyStats {
    pub posts_seen: usize,
    pub posts_counted: usize,
    pub posts_skipped: usize,
    /// Posts counted with `force` after deferral stalled
    pub posts_forced: usize,
    /// Deferrals, counting every retry
    pub deferrals: usize,
    /// Vote-shaped lines that failed to parse
    pub lines_skipped: usize,
    pub plans_registered: usize,
    /// Plan declarations rejected as duplicates or impersonations
    pub plans_rejected: usize,
}

/// Read-only view used to resolve references while a post is processed
struct ThreadIndex<'a> {
    posts: &'a [Post],
    plans: &'a PlanRegistry,
}

impl ThreadIndex<'_> {
    fn latest<'p>(
        &'p self,
        name: &str,
        before: Option<u64>,
        processed_only: bool,
    ) -> Option<&'p Post> {
        let key = agnostic::normalize(name);
        self.posts
            .iter()
            .filter(|post| post.origin().author_key() == key && post.has_vote())
            .filter(|post| before.is_none_or(|id| post.origin().post_id() < id))
            .filter(|post| !processed_only || post.is_processed())
            .max_by_key(|post| post.origin().post_id())
    }
}

impl ReferenceLookup for ThreadIndex<'_> {
    fn user_vote(&self, name: &str, before: Option<u64>) -> UserVote {
        match self.latest(name, before, false) {
            None => UserVote::Unknown,
            Some(post) if !post.is_processed() => UserVote::Pending,
            Some(post) => match VoteLineBlock::new(post.resolved_lines().to_vec()) {
                Ok(block) => UserVote::Ready(block),
                Err(_) => UserVote::Empty,
            },
        }
    }

    fn processed_user_vote(&self, name: &str, before: Option<u64>) -> Option<VoteLineBlock> {
        let post = self.latest(name, before, true)?;
        VoteLineBlock::new(post.resolved_lines().to_vec()).ok()
    }

    fn plan(&self, name: &str) -> Option<VoteLineBlock> {
        self.plans.get(name).map(|plan| plan.block.clone())
    }
}

/// Counts a thread's posts into supporter storage
#[derive(Debug, Clone, Default)]
pub struct VoteCounter {
    settings: TallySettings,
    posts: Vec<Post>,
    plans: PlanRegistry,
    storage: SupporterStorage,
    tasks: TaskList,
    stats: TallyStats,
    /// Author key → id of that author's counted post
    counted_by_author: HashMap<String, u64>,
}

impl VoteCounter {
    pub fn new(settings: TallySettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Load a thread's posts, replacing any earlier state.
    ///
    /// Posts are ordered by id, re-read with the spoiler setting, checked
    /// against the post filter, and scanned for plan declarations.
    pub fn load_posts(&mut self, mut posts: Vec<Post>) {
        posts.sort_by_key(|post| post.origin().post_id());
        for post in &mut posts {
            post.prepare(self.settings.ignore_spoilers);
            post.set_filtered(self.settings.post_filter.excludes(post.origin()));
        }

        self.plans = PlanRegistry::new();
        self.storage = SupporterStorage::new();
        self.tasks = TaskList::new();
        self.counted_by_author.clear();
        self.stats = TallyStats {
            posts_seen: posts.len(),
            lines_skipped: posts
                .iter()
                .filter(|post| !post.is_filtered())
                .map(Post::skipped_lines)
                .sum(),
            ..TallyStats::default()
        };

        let known_users: HashSet<String> = posts
            .iter()
            .map(|post| post.origin().author_key().to_string())
            .collect();
        for post in posts.iter().filter(|post| post.has_vote()) {
            for declaration in find_declarations(post.vote_lines(), &self.settings.custom_plans) {
                match self.plans.register(&declaration, post.origin(), &known_users) {
                    PlanRegistration::Registered => self.stats.plans_registered += 1,
                    PlanRegistration::Duplicate | PlanRegistration::Impersonation => {
                        self.stats.plans_rejected += 1
                    }
                }
            }
        }

        self.posts = posts;
    }

    /// Process one post.
    ///
    /// Without `force`, a post whose references point at unprocessed votes is
    /// deferred and left untouched. With `force`, such references fall back
    /// to the referenced user's latest processed vote, or stay as plain text.
    /// A later post by the same author replaces that author's earlier
    /// support. An index past the end is treated as a post with no vote.
    pub fn process_post(&mut self, index: usize, force: bool) -> PostOutcome {
        let Some(post) = self.posts.get(index) else {
            return PostOutcome::Skipped(SkipReason::NoVote);
        };
        if post.state() != PostState::Pending {
            return PostOutcome::Skipped(SkipReason::AlreadyProcessed);
        }

        let skip = if post.is_filtered() {
            Some(SkipReason::Filtered)
        } else if post.is_tally_report() {
            Some(SkipReason::TallyReport)
        } else if post.vote_lines().is_empty() {
            Some(SkipReason::NoVote)
        } else {
            None
        };
        if let Some(reason) = skip {
            self.posts[index].mark_skipped();
            self.stats.posts_skipped += 1;
            return PostOutcome::Skipped(reason);
        }

        let origin = post.origin().clone();
        let ctx = ResolveContext {
            author: origin.author(),
            post_id: origin.post_id(),
            force,
            allow_proxy_votes: self.settings.allow_proxy_votes,
            force_pinned_proxy_votes: self.settings.force_pinned_proxy_votes,
        };
        let index_view = ThreadIndex {
            posts: &self.posts,
            plans: &self.plans,
        };
        let working = match configure_working_vote(post.vote_lines(), &ctx, &index_view) {
            WorkingVoteResult::Ready(working) => working,
            WorkingVoteResult::Deferred => {
                self.stats.deferrals += 1;
                return PostOutcome::Deferred;
            }
        };
        let resolved = working.lines();

        let superseded = self
            .counted_by_author
            .get(origin.author_key())
            .is_some_and(|&counted| counted > origin.post_id());
        if superseded {
            self.posts[index].mark_processed(resolved, force);
            self.stats.posts_skipped += 1;
            return PostOutcome::Skipped(SkipReason::Superseded);
        }

        let blocks = self.partition_for_tally(&working);
        let votes = self.storage.votes_mut();
        votes.remove_voter_from_votes(&origin);
        for block in &blocks {
            votes.add_supporter_to_vote(block, origin.clone());
        }
        for block in &blocks {
            self.tasks.add(block.task());
        }

        let plans: Vec<(String, VoteLineBlock)> = self
            .plans
            .declared_in(origin.post_id())
            .map(|plan| (plan.name.clone(), plan.block.clone()))
            .collect();
        for (name, block) in plans {
            let plan_origin = Origin::plan(name, &origin);
            let plan_blocks = self.partition_for_tally(&WorkingVote::from_lines(block.lines()));
            let votes = self.storage.votes_mut();
            votes.remove_voter_from_votes(&plan_origin);
            for plan_block in &plan_blocks {
                votes.add_supporter_to_vote(plan_block, plan_origin.clone());
                self.tasks.add(plan_block.task());
            }
        }

        self.storage.votes_mut().remove_unsupported_votes();
        self.counted_by_author
            .insert(origin.author_key().to_string(), origin.post_id());
        self.posts[index].mark_processed(resolved, force);
        self.stats.posts_counted += 1;
        if force {
            self.stats.posts_forced += 1;
        }
        PostOutcome::Counted {
            blocks: blocks.len(),
        }
    }

    fn partition_for_tally(&self, working: &WorkingVote) -> Vec<VoteLineBlock> {
        partition(working, self.settings.partition_mode)
            .into_iter()
            .filter(|block| self.settings.accepts_task(block.task()))
            .collect()
    }

    pub fn settings(&self) -> &TallySettings {
        &self.settings
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    pub fn plans(&self) -> &PlanRegistry {
        &self.plans
    }

    pub fn storage(&self) -> &SupporterStorage {
        &self.storage
    }

    /// Storage for interactive edits (merge, split, join, delete, undo).
    pub fn storage_mut(&mut self) -> &mut SupporterStorage {
        &mut self.storage
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskList {
        &mut self.tasks
    }

    pub fn stats(&self) -> TallyStats {
        self.stats
    }

    /// Whether most of a task's votes are rank votes.
    pub fn is_ranked_task(&self, task: &str) -> bool {
        let votes = self.storage.votes();
        let task_votes = votes.votes_for_task(task);
        let ranked = task_votes
            .iter()
            .filter(|(vote, _)| votes.category_of(vote) == MarkerType::Rank)
            .count();
        ranked * 2 > task_votes.len()
    }

    /// Rank a task's votes with the configured method.
    pub fn ranked_results(&self, task: &str) -> Vec<RankedVote<'_>> {
        let task_votes = self.storage.votes().votes_for_task(task);
        self.settings
            .ranking_method
            .counter()
            .count_votes_for_task(&task_votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::PartitionMode;
    use crate::vote::{IdentityType, parse_lines};

    fn post(author: &str, id: u64, text: &str) -> Post {
        Post::new(Origin::new(author, id, id), text)
    }

    fn counter(mode: PartitionMode, posts: Vec<Post>) -> VoteCounter {
        let mut counter = VoteCounter::new(TallySettings::default().with_partition_mode(mode));
        counter.load_posts(posts);
        counter
    }

    fn vote(text: &str) -> VoteLineBlock {
        VoteLineBlock::new(parse_lines(text)).unwrap()
    }

    fn supporters(counter: &VoteCounter, text: &str) -> Vec<String> {
        counter
            .storage()
            .votes()
            .voters_for_vote(&vote(text))
            .into_iter()
            .map(|o| o.to_string())
            .collect()
    }

    fn process_all(counter: &mut VoteCounter, force: bool) -> Vec<PostOutcome> {
        (0..counter.post_count())
            .map(|i| counter.process_post(i, force))
            .collect()
    }

    #[test]
    fn test_two_voters_same_line() {
        let mut c = counter(
            PartitionMode::ByLine,
            vec![post("Alice", 1, "[x] Build the wall"), post("Bob", 2, "[x] Build the wall")],
        );
        process_all(&mut c, false);
        assert_eq!(c.storage().votes().len(), 1);
        assert_eq!(supporters(&c, "[x] Build the wall"), ["Alice", "Bob"]);
    }

    #[test]
    fn test_later_post_replaces_earlier_vote() {
        let mut c = counter(
            PartitionMode::ByLine,
            vec![post("Alice", 1, "[x] Wall"), post("Alice", 5, "[x] Moat")],
        );
        process_all(&mut c, false);
        assert!(!c.storage().votes().contains(&vote("[x] Wall")));
        assert_eq!(supporters(&c, "[x] Moat"), ["Alice"]);
    }

    #[test]
    fn test_earlier_post_processed_late_is_superseded() {
        let mut c = counter(
            PartitionMode::ByLine,
            vec![
                post("Alice", 1, "[x] Bob"),
                post("Alice", 3, "[x] Moat"),
                post("Bob", 5, "[x] Tower"),
            ],
        );
        assert_eq!(c.process_post(0, false), PostOutcome::Deferred);
        assert_eq!(c.process_post(1, false), PostOutcome::Counted { blocks: 1 });
        assert_eq!(c.process_post(2, false), PostOutcome::Counted { blocks: 1 });
        assert_eq!(c.process_post(0, false), PostOutcome::Skipped(SkipReason::Superseded));
        assert_eq!(supporters(&c, "[x] Moat"), ["Alice"]);
        assert_eq!(supporters(&c, "[x] Tower"), ["Bob"]);
    }

    #[test]
    fn test_future_reference_defers_until_target_processed() {
        let mut c = counter(
            PartitionMode::ByLine,
            vec![post("Alice", 1, "[x] Bob"), post("Bob", 2, "[x] Flank left")],
        );
        assert_eq!(c.process_post(0, false), PostOutcome::Deferred);
        assert!(!c.posts()[0].is_processed());
        assert!(c.storage().votes().is_empty());

        assert_eq!(c.process_post(1, false), PostOutcome::Counted { blocks: 1 });
        assert_eq!(c.process_post(0, false), PostOutcome::Counted { blocks: 1 });
        assert_eq!(supporters(&c, "[x] Flank left"), ["Alice", "Bob"]);
        assert_eq!(c.stats().deferrals, 1);
    }

    #[test]
    fn test_forced_cycle_keeps_reference_as_text() {
        let mut c = counter(
            PartitionMode::ByLine,
            vec![post("Alice", 1, "[x] Bob"), post("Bob", 2, "[x] Alice")],
        );
        assert_eq!(process_all(&mut c, false), [PostOutcome::Deferred, PostOutcome::Deferred]);
        assert_eq!(c.process_post(0, true), PostOutcome::Counted { blocks: 1 });
        assert_eq!(c.process_post(1, false), PostOutcome::Counted { blocks: 1 });
        assert_eq!(supporters(&c, "[x] Bob"), ["Alice", "Bob"]);
        assert_eq!(c.stats().posts_forced, 1);
    }

    #[test]
    fn test_plan_content_block_and_reference_under_block_all() {
        let mut c = counter(
            PartitionMode::ByBlockAll,
            vec![
                post("Alice", 1, "[x] Plan: Raid\n-[x] Gather troops"),
                post("Bob", 2, "[x] Plan: Raid"),
            ],
        );
        process_all(&mut c, false);
        assert_eq!(c.storage().votes().len(), 1);
        assert_eq!(
            supporters(&c, "[x] Gather troops"),
            ["Alice", "Bob", "Plan: Raid"]
        );
    }

    #[test]
    fn test_plan_reference_under_block() {
        let mut c = counter(
            PartitionMode::ByBlock,
            vec![
                post("Alice", 1, "[x] Plan Raid\n-[x] Gather troops\n-[x] Attack"),
                post("Bob", 2, "[1] plan: raid"),
            ],
        );
        process_all(&mut c, false);
        let all = c.storage().votes().all_votes();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].supporters.user_count(), 2);
        let bob = all[0].supporters.find_by_name("Bob", IdentityType::User).unwrap();
        let submitted = all[0].supporters.get(bob).unwrap();
        assert_eq!(submitted.marker_type(), MarkerType::Rank);
        assert_eq!(submitted.first().clean_content(), "Plan: Raid");
    }

    #[test]
    fn test_custom_plan_name_registers_unlabelled_block() {
        let posts = || {
            vec![
                post("Alice", 1, "[x] Nightfall\n-[x] Scout the walls"),
                post("Bob", 2, "[x] Nightfall"),
            ]
        };
        let settings = TallySettings::default()
            .with_partition_mode(PartitionMode::ByBlock)
            .with_custom_plans(vec!["nightfall".to_string()]);
        let mut c = VoteCounter::new(settings);
        c.load_posts(posts());
        process_all(&mut c, false);
        assert_eq!(c.stats().plans_registered, 1);
        let mut names = supporters(&c, "[x] Nightfall\n-[x] Scout the walls");
        names.sort();
        assert_eq!(names, ["Alice", "Bob", "Plan: Nightfall"]);

        let mut plain = counter(PartitionMode::ByBlock, posts());
        process_all(&mut plain, false);
        assert_eq!(plain.stats().plans_registered, 0);
        assert_eq!(supporters(&plain, "[x] Nightfall"), ["Bob"]);
    }

    #[test]
    fn test_base_plan_is_not_the_authors_vote() {
        let mut c = counter(
            PartitionMode::ByBlockAll,
            vec![
                post("Alice", 1, "[x] Base Plan: Raid\n-[x] Gather troops\n[x] Moat"),
                post("Bob", 2, "[x] Plan: Raid"),
            ],
        );
        process_all(&mut c, false);
        assert_eq!(supporters(&c, "[x] Gather troops"), ["Bob", "Plan: Raid"]);
        assert_eq!(supporters(&c, "[x] Moat"), ["Alice"]);
    }

    #[test]
    fn test_skips_reports_and_filtered_posts() {
        let mut settings = TallySettings::default();
        settings.post_filter.excluded_authors = vec!["QM".to_string()];
        let mut c = VoteCounter::new(settings);
        c.load_posts(vec![
            post("QM", 1, "[x] Free vote"),
            post("Alice", 2, "##### Tally\n[x] Wall"),
            post("Bob", 3, "Chatter"),
            post("Carol", 4, "[x] Wall"),
        ]);
        let outcomes = process_all(&mut c, false);
        assert_eq!(
            outcomes,
            [
                PostOutcome::Skipped(SkipReason::Filtered),
                PostOutcome::Skipped(SkipReason::TallyReport),
                PostOutcome::Skipped(SkipReason::NoVote),
                PostOutcome::Counted { blocks: 1 },
            ]
        );
        assert_eq!(c.process_post(3, false), PostOutcome::Skipped(SkipReason::AlreadyProcessed));
        assert_eq!(c.stats().posts_skipped, 3);
        assert_eq!(c.stats().posts_counted, 1);
    }

    #[test]
    fn test_task_filter_and_task_list() {
        let settings = TallySettings::default()
            .with_partition_mode(PartitionMode::ByLine)
            .with_task_filter(vec!["Build".to_string(), "Scout".to_string()]);
        let mut c = VoteCounter::new(settings);
        c.load_posts(vec![post(
            "Alice",
            1,
            "[x][Scout] North\n[x][Tactics] Flank\n[x][build] Wall",
        )]);
        process_all(&mut c, false);
        assert_eq!(c.storage().votes().len(), 2);
        assert_eq!(c.tasks().as_slice(), ["Scout", "build"]);
    }

    #[test]
    fn test_proxy_votes_disabled_keeps_name_as_text() {
        let settings = TallySettings::default()
            .with_partition_mode(PartitionMode::ByLine)
            .with_proxy_votes(false);
        let mut c = VoteCounter::new(settings);
        c.load_posts(vec![post("Alice", 1, "[x] Wall"), post("Bob", 2, "[x] Alice")]);
        process_all(&mut c, false);
        assert_eq!(supporters(&c, "[x] Alice"), ["Bob"]);
    }

    #[test]
    fn test_pinned_reference_uses_earlier_vote() {
        let mut c = counter(
            PartitionMode::ByLine,
            vec![
                post("Alice", 1, "[x] Wall"),
                post("Bob", 2, "[x] ^Alice"),
                post("Alice", 3, "[x] Moat"),
            ],
        );
        process_all(&mut c, false);
        assert_eq!(supporters(&c, "[x] Wall"), ["Bob"]);
        assert_eq!(supporters(&c, "[x] Moat"), ["Alice"]);
    }

    #[test]
    fn test_ranked_task() {
        let mut c = counter(
            PartitionMode::ByLine,
            vec![
                post("Alice", 1, "[1][Order] Wall\n[2][Order] Moat"),
                post("Bob", 2, "[1][Order] Moat\n[2][Order] Wall"),
                post("Carol", 3, "[1][Order] Moat\n[2][Order] Wall"),
            ],
        );
        process_all(&mut c, false);
        assert!(c.is_ranked_task("Order"));
        let ranked = c.ranked_results("Order");
        assert_eq!(ranked[0].vote.first().clean_content(), "Moat");
        assert_eq!(ranked[0].score.rank, 1);
    }

    #[test]
    fn test_counts_skipped_lines() {
        let c = counter(
            PartitionMode::ByLine,
            vec![post("Alice", 1, "[ ] Oops\n[x] Wall"), post("Bob", 2, "[?] Huh")],
        );
        assert_eq!(c.stats().lines_skipped, 2);
        assert_eq!(c.stats().posts_seen, 2);
    }
}
