//! Recognise proxy references inside vote content.
//!
//! ```text
//! (^ | ↑ | plan | base plan | proposed plan)? ':'? <name>
//! ```

use serde::Serialize;

/// How a reference was labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceLabel {
    /// No label; may name a user or a plan
    None,
    /// `^` or `↑`: a user's vote before the current post
    Pinned,
    /// `plan`
    Plan,
    /// `base plan`
    BasePlan,
    /// `proposed plan`
    ProposedPlan,
}

impl ReferenceLabel {
    /// Plan-leaning labels look up plans first.
    pub fn is_plan(self) -> bool {
        matches!(
            self,
            ReferenceLabel::Plan | ReferenceLabel::BasePlan | ReferenceLabel::ProposedPlan
        )
    }

    /// A proposal declares a plan without voting for it.
    pub fn is_proposal(self) -> bool {
        matches!(self, ReferenceLabel::BasePlan | ReferenceLabel::ProposedPlan)
    }
}

/// A candidate reference extracted from a line's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub label: ReferenceLabel,
    pub name: String,
}

const WORD_LABELS: [(&str, ReferenceLabel); 3] = [
    ("base plan", ReferenceLabel::BasePlan),
    ("proposed plan", ReferenceLabel::ProposedPlan),
    ("plan", ReferenceLabel::Plan),
];

/// Extract a reference from clean (markup-free) content.
///
/// Returns `None` when no name remains after the label.
pub fn parse_reference(content: &str) -> Option<Reference> {
    let text = content.trim();

    let (label, rest) = if let Some(rest) = text.strip_prefix(['^', '↑']) {
        (ReferenceLabel::Pinned, rest)
    } else {
        match strip_word_label(text) {
            Some((label, rest)) => (label, rest),
            None => (ReferenceLabel::None, text),
        }
    };

    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    let name = rest.trim();
    if name.is_empty() {
        return None;
    }

    Some(Reference {
        label,
        name: name.to_string(),
    })
}

/// Match a word label case-insensitively, requiring a word boundary after it.
fn strip_word_label(text: &str) -> Option<(ReferenceLabel, &str)> {
    WORD_LABELS.iter().find_map(|(word, label)| {
        let head = text.get(..word.len())?;
        if !head.eq_ignore_ascii_case(word) {
            return None;
        }
        let rest = &text[word.len()..];
        let boundary = rest
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || c == ':');
        boundary.then_some((*label, rest))
    })
}

/// Name of the plan a line declares, if its content carries a plan label.
pub fn plan_label(content: &str) -> Option<(ReferenceLabel, String)> {
    let reference = parse_reference(content)?;
    reference
        .label
        .is_plan()
        .then_some((reference.label, reference.name))
}
