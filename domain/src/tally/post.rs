//! A forum post and the vote lines read from it.

use crate::vote::tokenizer::looks_like_vote;
use crate::vote::{Origin, VoteLine, parse_line, strip_markup};
use serde::Serialize;

/// Lines starting with this mark a previously posted tally report.
const TALLY_REPORT_MARK: &str = "#####";

/// Where a post is in the counting process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostState {
    #[default]
    Pending,
    /// Counted, or resolved and then superseded by a later post
    Processed,
    /// Never counted
    Skipped,
}

/// One post in a thread
#[derive(Debug, Clone)]
pub struct Post {
    origin: Origin,
    text: String,
    vote_lines: Vec<VoteLine>,
    skipped_lines: usize,
    tally_report: bool,
    filtered: bool,
    state: PostState,
    forced: bool,
    resolved: Vec<VoteLine>,
}

impl Post {
    /// Create a post and read its vote lines, ignoring spoilers.
    pub fn new(origin: Origin, text: impl Into<String>) -> Self {
        let mut post = Self {
            origin,
            text: text.into(),
            vote_lines: Vec::new(),
            skipped_lines: 0,
            tally_report: false,
            filtered: false,
            state: PostState::Pending,
            forced: false,
            resolved: Vec::new(),
        };
        post.prepare(true);
        post
    }

    /// Re-read vote lines from the raw text.
    pub fn prepare(&mut self, ignore_spoilers: bool) {
        let text = if ignore_spoilers {
            strip_spoilers(&self.text)
        } else {
            self.text.clone()
        };

        self.vote_lines.clear();
        self.skipped_lines = 0;
        self.tally_report = false;

        for raw in text.lines() {
            if strip_markup(raw).trim_start().starts_with(TALLY_REPORT_MARK) {
                self.tally_report = true;
            }
            match parse_line(raw) {
                Some(line) => self.vote_lines.push(line),
                None if looks_like_vote(raw) => self.skipped_lines += 1,
                None => {}
            }
        }

        if self.tally_report {
            self.vote_lines.clear();
            self.skipped_lines = 0;
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn vote_lines(&self) -> &[VoteLine] {
        &self.vote_lines
    }

    /// Lines shaped like votes that failed to parse
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn is_tally_report(&self) -> bool {
        self.tally_report
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    pub(crate) fn set_filtered(&mut self, filtered: bool) {
        self.filtered = filtered;
    }

    /// Whether this post can contribute a vote at all
    pub fn has_vote(&self) -> bool {
        !self.filtered && !self.tally_report && !self.vote_lines.is_empty()
    }

    pub fn state(&self) -> PostState {
        self.state
    }

    pub fn is_processed(&self) -> bool {
        self.state == PostState::Processed
    }

    pub fn was_forced(&self) -> bool {
        self.forced
    }

    /// The post's vote with references inlined, once processed
    pub fn resolved_lines(&self) -> &[VoteLine] {
        &self.resolved
    }

    pub(crate) fn mark_processed(&mut self, resolved: Vec<VoteLine>, forced: bool) {
        self.state = PostState::Processed;
        self.resolved = resolved;
        self.forced = forced;
    }

    pub(crate) fn mark_skipped(&mut self) {
        self.state = PostState::Skipped;
    }
}

/// Remove `[spoiler]...[/spoiler]` sections, nested ones included.
///
/// An unclosed spoiler hides the rest of the text.
pub fn strip_spoilers(text: &str) -> String {
    const CLOSE: &str = "[/spoiler]";
    let lower = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut copy_from = 0;
    let mut i = 0;

    while i < text.len() {
        let rest = &lower[i..];
        let opens = rest.starts_with("[spoiler")
            && matches!(rest.as_bytes().get(8), Some(b']') | Some(b'='));
        if opens {
            if let Some(end) = rest.find(']') {
                if depth == 0 {
                    out.push_str(&text[copy_from..i]);
                }
                depth += 1;
                i += end + 1;
                copy_from = i;
                continue;
            }
        }
        if depth > 0 && rest.starts_with(CLOSE) {
            depth -= 1;
            i += CLOSE.len();
            copy_from = i;
            continue;
        }
        i += rest.chars().next().map_or(1, char::len_utf8);
    }

    if depth == 0 {
        out.push_str(&text[copy_from..]);
    }
    out
}
