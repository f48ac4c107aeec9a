//! A post's vote with references inlined.

use super::plan::body_end;
use crate::reference::{ReferenceLookup, Resolution, ResolveContext, plan_label, resolve_line};
use crate::vote::{VoteLine, VoteLineBlock};

/// One item of a working vote
#[derive(Debug, Clone, PartialEq)]
pub enum WorkingItem {
    /// A line the author wrote
    Line(VoteLine),
    /// A referenced vote, already shifted under the referencing line
    Inlined(VoteLineBlock),
}

/// The flat sequence of own lines and inlined blocks for one post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingVote {
    items: Vec<WorkingItem>,
}

/// Result of configuring a working vote
#[derive(Debug, Clone, PartialEq)]
pub enum WorkingVoteResult {
    Ready(WorkingVote),
    /// A referenced user's vote is not processed yet
    Deferred,
}

impl WorkingVote {
    pub fn new(items: Vec<WorkingItem>) -> Self {
        Self { items }
    }

    /// A working vote made only of the given lines, with no references.
    pub fn from_lines(lines: &[VoteLine]) -> Self {
        Self {
            items: lines.iter().cloned().map(WorkingItem::Line).collect(),
        }
    }

    pub fn items(&self) -> &[WorkingItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every line in order, inlined blocks expanded.
    pub fn lines(&self) -> Vec<VoteLine> {
        self.items
            .iter()
            .flat_map(|item| match item {
                WorkingItem::Line(line) => std::slice::from_ref(line),
                WorkingItem::Inlined(block) => block.lines(),
            })
            .cloned()
            .collect()
    }
}

/// Inline every reference in a post's vote.
///
/// Lines with deeper lines below them are never treated as references.
/// `Base Plan` and `Proposed Plan` declarations are skipped entirely: they
/// propose a plan without voting for it. If any referenced user's vote is
/// still pending and `ctx.force` is not set, the whole post is deferred.
pub fn configure_working_vote(
    lines: &[VoteLine],
    ctx: &ResolveContext<'_>,
    lookup: &dyn ReferenceLookup,
) -> WorkingVoteResult {
    let mut items = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        let end = body_end(lines, i);
        let has_children = end > i + 1;

        if has_children {
            let is_proposal = plan_label(line.clean_content())
                .is_some_and(|(label, _)| label.is_proposal());
            if is_proposal {
                i = end;
                continue;
            }
            items.push(WorkingItem::Line(line.clone()));
            i += 1;
            continue;
        }

        match resolve_line(line, ctx, lookup) {
            Resolution::Resolved(block) => items.push(WorkingItem::Inlined(inline_under(line, &block))),
            Resolution::Unresolved => items.push(WorkingItem::Line(line.clone())),
            Resolution::Deferred => return WorkingVoteResult::Deferred,
        }
        i += 1;
    }

    WorkingVoteResult::Ready(WorkingVote::new(items))
}

/// Place a referenced block where the referencing line stood.
///
/// Depths shift by the referencing line's depth. Unmarked lines take the
/// referencing line's marker, and a task on the referencing line replaces the
/// block's task.
pub fn inline_under(referencing: &VoteLine, block: &VoteLineBlock) -> VoteLineBlock {
    let base = block.rerooted();
    let shift = referencing.depth();
    let lines: Vec<VoteLine> = base
        .lines()
        .iter()
        .map(|line| {
            let moved = line.with_depth(line.depth() + shift);
            if moved.marker().is_none() {
                moved.with_marker(referencing.marker().clone())
            } else {
                moved
            }
        })
        .collect();

    let inlined = VoteLineBlock::new(lines).unwrap_or(base);
    if referencing.task().is_empty() {
        inlined
    } else {
        inlined.with_task(referencing.task())
    }
}
