//! Plan declarations and their normalized form.

use crate::core::agnostic;
use crate::reference::{ReferenceLabel, plan_label};
use crate::vote::{Marker, VoteLine, VoteLineBlock};

/// A plan declared inside a post
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDeclaration {
    pub label: ReferenceLabel,
    pub name: String,
    /// Header line plus body, as written
    pub block: VoteLineBlock,
}

/// Whether a block is a content block: a plan header followed by deeper lines.
pub fn content_block_name(block: &VoteLineBlock) -> Option<(ReferenceLabel, String)> {
    if block.len() < 2 {
        return None;
    }
    let header = block.first();
    if !block.lines()[1..].iter().all(|l| l.depth() > header.depth()) {
        return None;
    }
    plan_label(header.clean_content())
}

/// Find every plan declaration among a post's lines.
///
/// A declaration is a line with a plan label that has deeper lines directly
/// below it; its body runs until the next line at the same or a shallower
/// depth. A header that reads exactly like one of `custom_plans` declares a
/// plan of that name without needing a label.
pub fn find_declarations(lines: &[VoteLine], custom_plans: &[String]) -> Vec<PlanDeclaration> {
    let mut found = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let header = &lines[i];
        let end = body_end(lines, i);
        if end > i + 1 {
            if let Some((label, name)) = declared_name(header.clean_content(), custom_plans) {
                if let Ok(block) = VoteLineBlock::new(lines[i..end].to_vec()) {
                    found.push(PlanDeclaration { label, name, block });
                }
                i = end;
                continue;
            }
        }
        i += 1;
    }
    found
}

fn declared_name(content: &str, custom_plans: &[String]) -> Option<(ReferenceLabel, String)> {
    plan_label(content).or_else(|| {
        custom_plans
            .iter()
            .any(|name| agnostic::agnostic_eq(name, content))
            .then(|| (ReferenceLabel::Plan, content.trim().to_string()))
    })
}

/// Index one past the last line nested under `lines[start]`.
pub(crate) fn body_end(lines: &[VoteLine], start: usize) -> usize {
    let depth = lines[start].depth();
    lines[start + 1..]
        .iter()
        .position(|l| l.depth() <= depth)
        .map_or(lines.len(), |offset| start + 1 + offset)
}

/// Rewrite a plan so every declaration style compares the same.
///
/// A labelled header becomes `Plan: <name>`; an unlabelled one is kept.
/// Every marker is cleared.
pub fn normalize_plan(block: &VoteLineBlock, name: &str) -> VoteLineBlock {
    let unmarked = block.with_marker(Marker::none()).rerooted();
    let mut lines = unmarked.into_lines();
    if plan_label(lines[0].clean_content()).is_some() {
        lines[0] = lines[0].with_content(format!("Plan: {name}"));
    }
    VoteLineBlock::new(lines).unwrap_or_else(|_| block.clone())
}
