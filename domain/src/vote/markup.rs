//! BBCode-style inline markup handling.
//!
//! Forum posts wrap vote text in tags such as `[b]`, `[color=red]` or
//! `[url=...]`. Tags are stripped before comparison, and content that keeps
//! its tags is rebalanced because forum software may truncate a line between
//! an open tag and its close.

/// Tags recognised as inline markup. Anything else in brackets is text.
const KNOWN_TAGS: [&str; 10] = ["b", "i", "u", "s", "color", "url", "size", "font", "sub", "sup"];

/// A single markup tag found in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// `[name]` or `[name=value]`
    Open(String),
    /// `[/name]`
    Close(String),
}

impl Tag {
    pub fn name(&self) -> &str {
        match self {
            Tag::Open(name) | Tag::Close(name) => name,
        }
    }

    pub fn is_close(&self) -> bool {
        matches!(self, Tag::Close(_))
    }
}

/// Match a markup tag at the very start of `text`.
///
/// Returns the tag (name lowercased) and its length in bytes.
pub fn tag_at(text: &str) -> Option<(Tag, usize)> {
    let rest = text.strip_prefix('[')?;
    let (closing, rest) = match rest.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };

    let name_len = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let name = rest[..name_len].to_ascii_lowercase();
    if !KNOWN_TAGS.contains(&name.as_str()) {
        return None;
    }

    let after_name = &rest[name_len..];
    let consumed = if after_name.starts_with(']') {
        1
    } else if !closing && after_name.starts_with('=') {
        let end = after_name.find(|c| c == ']' || c == '[' || c == '\n')?;
        if !after_name[end..].starts_with(']') {
            return None;
        }
        end + 1
    } else {
        return None;
    };

    let len = 1 + usize::from(closing) + name_len + consumed;
    let tag = if closing {
        Tag::Close(name)
    } else {
        Tag::Open(name)
    };
    Some((tag, len))
}

/// Split text into literal runs and tags.
fn tokens(text: &str) -> Vec<(Option<Tag>, &str)> {
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < text.len() {
        if text[i..].starts_with('[') {
            if let Some((tag, len)) = tag_at(&text[i..]) {
                if literal_start < i {
                    out.push((None, &text[literal_start..i]));
                }
                out.push((Some(tag), &text[i..i + len]));
                i += len;
                literal_start = i;
                continue;
            }
        }
        i += text[i..].chars().next().map_or(1, char::len_utf8);
    }
    if literal_start < text.len() {
        out.push((None, &text[literal_start..]));
    }
    out
}

/// Remove every known markup tag, keeping the text between them.
pub fn strip_markup(text: &str) -> String {
    tokens(text)
        .into_iter()
        .filter(|(tag, _)| tag.is_none())
        .map(|(_, raw)| raw)
        .collect()
}

/// Balance open and close tags.
///
/// Close tags with no matching open tag are dropped; open tags that are never
/// closed get a close tag appended at the end, innermost first. The result is
/// trimmed. Applying this twice gives the same result as applying it once.
pub fn normalize_markup(text: &str) -> String {
    let mut open: Vec<String> = Vec::new();
    let mut out = String::with_capacity(text.len());

    for (tag, raw) in tokens(text) {
        match tag {
            None => out.push_str(raw),
            Some(Tag::Open(name)) => {
                open.push(name);
                out.push_str(raw);
            }
            Some(Tag::Close(name)) => {
                if let Some(pos) = open.iter().rposition(|n| *n == name) {
                    open.remove(pos);
                    out.push_str(raw);
                }
            }
        }
    }

    for name in open.iter().rev() {
        out.push_str("[/");
        out.push_str(name);
        out.push(']');
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_at_open_and_close() {
        assert_eq!(tag_at("[b]bold"), Some((Tag::Open("b".to_string()), 3)));
        assert_eq!(tag_at("[/B] rest"), Some((Tag::Close("b".to_string()), 4)));
        assert_eq!(
            tag_at("[color=#ff0000]red"),
            Some((Tag::Open("color".to_string()), 15))
        );
    }

    #[test]
    fn test_tag_at_rejects_markers_and_tasks() {
        assert_eq!(tag_at("[x] vote"), None);
        assert_eq!(tag_at("[Tactics] Flank"), None);
        assert_eq!(tag_at("[b"), None);
        assert_eq!(tag_at("[/color=red]"), None);
        assert_eq!(tag_at("b]"), None);
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("[b]Flank[/b] left"), "Flank left");
        assert_eq!(
            strip_markup("[url=http://x.test/a]link[/url] [note]"),
            "link [note]"
        );
        assert_eq!(strip_markup("plain"), "plain");
    }

    #[test]
    fn test_normalize_closes_orphan_open() {
        assert_eq!(normalize_markup("[b]Flank [i]left"), "[b]Flank [i]left[/i][/b]");
    }

    #[test]
    fn test_normalize_drops_orphan_close() {
        assert_eq!(normalize_markup("Flank left[/b]"), "Flank left");
        assert_eq!(normalize_markup("[/i][b]x[/b]"), "[b]x[/b]");
    }

    #[test]
    fn test_normalize_keeps_balanced_text() {
        let text = "[b]Flank[/b] [color=red]left[/color]";
        assert_eq!(normalize_markup(text), text);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "  [b]a[i]b[/b]c[/i] ",
            "[/u][/s]x[u]",
            "[b][i][u]deep",
            "[color=blue]x[/color][/color]",
            "not [a] tag [b]but this[/b]",
            "ünïcode [s]strike",
        ];
        for sample in samples {
            let once = normalize_markup(sample);
            assert_eq!(normalize_markup(&once), once, "input: {sample:?}");
        }
    }

    #[test]
    fn test_tokens_handle_multibyte_text() {
        assert_eq!(strip_markup("—[b]☒[/b]—"), "—☒—");
    }
}
