//! Resolve references to user votes and plans.
//!
//! Lookups go through [`ReferenceLookup`] so the resolver stays independent
//! of how posts and plans are stored.

use super::parsing::{Reference, ReferenceLabel, parse_reference};
use crate::core::agnostic;
use crate::vote::{VoteLine, VoteLineBlock};

/// State of a referenced user's vote
#[derive(Debug, Clone, PartialEq)]
pub enum UserVote {
    /// No post by that user is part of the tally
    Unknown,
    /// The user's vote exists but has not been processed yet
    Pending,
    /// The user's processed vote
    Ready(VoteLineBlock),
    /// The user's post was processed but contributed no lines
    Empty,
}

/// Read access to the thread state needed to resolve references
pub trait ReferenceLookup {
    /// The user's latest vote, restricted to posts before `before` when set.
    fn user_vote(&self, name: &str, before: Option<u64>) -> UserVote;

    /// The user's latest vote that has already been processed.
    fn processed_user_vote(&self, name: &str, before: Option<u64>) -> Option<VoteLineBlock>;

    /// A registered plan's normalized block.
    fn plan(&self, name: &str) -> Option<VoteLineBlock>;
}

/// Per-post resolution settings
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Author of the post being resolved
    pub author: &'a str,
    /// Id of the post being resolved
    pub post_id: u64,
    /// Process even when a referenced vote is still pending
    pub force: bool,
    pub allow_proxy_votes: bool,
    pub force_pinned_proxy_votes: bool,
}

/// Outcome of resolving one line
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The line stands for this block
    Resolved(VoteLineBlock),
    /// Not a reference; keep the line as written
    Unresolved,
    /// The referenced vote is not processed yet
    Deferred,
}

/// Resolve a single vote line against users and plans.
pub fn resolve_line(
    line: &VoteLine,
    ctx: &ResolveContext<'_>,
    lookup: &dyn ReferenceLookup,
) -> Resolution {
    match parse_reference(line.clean_content()) {
        Some(reference) => resolve_reference(&reference, ctx, lookup),
        None => Resolution::Unresolved,
    }
}

pub fn resolve_reference(
    reference: &Reference,
    ctx: &ResolveContext<'_>,
    lookup: &dyn ReferenceLookup,
) -> Resolution {
    match reference.label {
        ReferenceLabel::Pinned => resolve_user(&reference.name, true, ctx, lookup),
        ReferenceLabel::None => match resolve_user(&reference.name, false, ctx, lookup) {
            Resolution::Unresolved => resolve_plan(&reference.name, lookup),
            other => other,
        },
        ReferenceLabel::Plan | ReferenceLabel::BasePlan | ReferenceLabel::ProposedPlan => {
            match resolve_plan(&reference.name, lookup) {
                Resolution::Unresolved => resolve_user(&reference.name, false, ctx, lookup),
                other => other,
            }
        }
    }
}

fn resolve_plan(name: &str, lookup: &dyn ReferenceLookup) -> Resolution {
    match lookup.plan(name) {
        Some(block) => Resolution::Resolved(block),
        None => Resolution::Unresolved,
    }
}

fn resolve_user(
    name: &str,
    pinned: bool,
    ctx: &ResolveContext<'_>,
    lookup: &dyn ReferenceLookup,
) -> Resolution {
    if !ctx.allow_proxy_votes || agnostic::agnostic_eq(name, ctx.author) {
        return Resolution::Unresolved;
    }

    let before = (pinned || ctx.force_pinned_proxy_votes).then_some(ctx.post_id);
    match lookup.user_vote(name, before) {
        UserVote::Ready(block) => Resolution::Resolved(block),
        UserVote::Unknown | UserVote::Empty => Resolution::Unresolved,
        UserVote::Pending if !ctx.force => Resolution::Deferred,
        UserVote::Pending => match lookup.processed_user_vote(name, before) {
            Some(block) => Resolution::Resolved(block),
            None => Resolution::Unresolved,
        },
    }
}
