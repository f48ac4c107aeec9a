//! Split a working vote into countable blocks.

use super::mode::PartitionMode;
use super::plan::content_block_name;
use super::working_vote::{WorkingItem, WorkingVote};
use crate::vote::{VoteLine, VoteLineBlock};

/// Partition a working vote according to `mode`.
pub fn partition(vote: &WorkingVote, mode: PartitionMode) -> Vec<VoteLineBlock> {
    match mode {
        PartitionMode::None => VoteLineBlock::new(vote.lines()).into_iter().collect(),
        PartitionMode::ByLine => vote
            .lines()
            .into_iter()
            .map(|line| VoteLineBlock::from_line(line.with_depth(0)))
            .collect(),
        PartitionMode::ByLineTask => by_line_task(vote),
        PartitionMode::ByBlock => by_block(&vote.lines()),
        PartitionMode::ByBlockAll => by_block_all(&vote.lines()),
    }
}

/// Every line alone, inheriting the task of its nearest tasked ancestor.
///
/// Consecutive own lines share one cascade; an inlined block starts a fresh
/// one and the own lines after it start over too.
fn by_line_task(vote: &WorkingVote) -> Vec<VoteLineBlock> {
    let mut out = Vec::new();
    let mut run: Vec<VoteLine> = Vec::new();
    for item in vote.items() {
        match item {
            WorkingItem::Line(line) => run.push(line.clone()),
            WorkingItem::Inlined(block) => {
                cascade(&run, &mut out);
                run.clear();
                cascade(block.lines(), &mut out);
            }
        }
    }
    cascade(&run, &mut out);
    out
}

fn cascade(lines: &[VoteLine], out: &mut Vec<VoteLineBlock>) {
    let mut stack: Vec<(usize, String)> = Vec::new();
    for line in lines {
        let depth = line.depth();
        while stack.last().is_some_and(|(d, _)| *d >= depth) {
            stack.pop();
        }
        let task = if line.task().is_empty() {
            stack.last().map(|(_, t)| t.clone()).unwrap_or_default()
        } else {
            line.task().to_string()
        };
        out.push(VoteLineBlock::from_line(line.with_task(task.clone()).with_depth(0)));
        stack.push((depth, task));
    }
}

/// Group lines into blocks, starting a new block at every line that is no
/// deeper than the current block's first line.
fn by_block(lines: &[VoteLine]) -> Vec<VoteLineBlock> {
    let mut groups: Vec<Vec<VoteLine>> = Vec::new();
    for line in lines {
        match groups.last_mut() {
            Some(group) if line.depth() > group[0].depth() => group.push(line.clone()),
            _ => groups.push(vec![line.clone()]),
        }
    }
    groups
        .into_iter()
        .filter_map(|group| VoteLineBlock::new(group).ok())
        .map(|block| block.rerooted())
        .collect()
}

/// `by_block`, then split the body of every content block into its own
/// blocks, dropping the plan header.
fn by_block_all(lines: &[VoteLine]) -> Vec<VoteLineBlock> {
    let mut out = Vec::new();
    for block in by_block(lines) {
        if content_block_name(&block).is_some() {
            let body: Vec<VoteLine> = block.lines()[1..].to_vec();
            let promoted = match VoteLineBlock::new(body) {
                Ok(body) => body.rerooted(),
                Err(_) => continue,
            };
            out.extend(by_block_all(promoted.lines()));
        } else {
            out.push(block);
        }
    }
    out
}
