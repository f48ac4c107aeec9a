//! Line tokenizer: raw post text to [`VoteLine`].
//!
//! Grammar, left to right:
//!
//! ```text
//! <line>   ::= <prefix>? <marker> <task>? <content>
//! <prefix> ::= ('-' | '–' | '—' | whitespace)*
//! <marker> ::= '☒' | '☑' | '[' markerglyph ']'
//! <task>   ::= '[' text ']'   ; immediately after the marker
//! ```
//!
//! Markup tags may appear anywhere before the content and are skipped.
//! Lines that do not match return `None`; the tokenizer never panics on
//! untrusted text.

use super::line::{DEPTH_CHARS, VoteLine};
use super::marker::Marker;
use super::markup::{Tag, strip_markup, tag_at};

/// Parse one line of post text.
pub fn parse_line(text: &str) -> Option<VoteLine> {
    let mut rest = text;
    let mut prefix = String::new();

    // Prefix: whitespace, depth characters and markup tags in any order
    loop {
        rest = rest.trim_start();
        if let Some((_, len)) = tag_at(rest) {
            rest = &rest[len..];
            continue;
        }
        match rest.chars().next() {
            Some(c) if DEPTH_CHARS.contains(&c) => {
                prefix.push(c);
                rest = &rest[c.len_utf8()..];
            }
            _ => break,
        }
    }

    let (marker, after_marker) = parse_marker(rest)?;
    rest = skip_close_tags(after_marker);

    let mut task = String::new();
    if opens_task(rest) {
        if let Some((inner, after_task)) = bracketed(rest) {
            task = strip_markup(inner).trim().to_string();
            rest = after_task;
        }
    }

    // Close tags left over from markup wrapped around the marker or task
    loop {
        rest = rest.trim_start();
        match tag_at(rest) {
            Some((tag, len)) if tag.is_close() => rest = &rest[len..],
            _ => break,
        }
    }

    let line = VoteLine::new(prefix, marker, task, rest);
    if line.clean_content().is_empty() {
        return None;
    }
    Some(line)
}

/// Parse every line of a post, keeping only the vote lines.
pub fn parse_lines(text: &str) -> Vec<VoteLine> {
    text.lines().filter_map(parse_line).collect()
}

/// Whether a line is shaped like a vote, whether or not it parses.
pub fn looks_like_vote(text: &str) -> bool {
    let stripped = strip_markup(text);
    stripped
        .trim_start()
        .starts_with(|c: char| c == '[' || c == '☒' || c == '☑' || DEPTH_CHARS.contains(&c))
}

fn parse_marker(text: &str) -> Option<(Marker, &str)> {
    let first = text.chars().next()?;
    if let Some(marker) = Marker::glyph(first) {
        return Some((marker, &text[first.len_utf8()..]));
    }
    if first != '[' {
        return None;
    }
    let (inner, after) = bracketed(text)?;
    let marker = Marker::parse(&strip_markup(inner))?;
    Some((marker, after))
}

/// Split `[inner]rest` into `inner` and `rest`, stepping over markup tags
/// inside the brackets.
fn bracketed(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix('[')?;
    let mut i = 0;
    while i < body.len() {
        let tail = &body[i..];
        if let Some((_, len)) = tag_at(tail) {
            i += len;
            continue;
        }
        let c = tail.chars().next()?;
        match c {
            ']' => return Some((&body[..i], &body[i + 1..])),
            '[' | '\n' => return None,
            _ => i += c.len_utf8(),
        }
    }
    None
}

/// Whether the text right after the marker starts a task label.
///
/// A bare tag name such as `[Size]` or `[S]` is a task unless its close tag
/// appears later in the line. `[name=value]` is always markup.
fn opens_task(text: &str) -> bool {
    if !text.starts_with('[') {
        return false;
    }
    match tag_at(text) {
        None => true,
        Some((Tag::Open(name), len)) => {
            let close = format!("[/{name}]");
            !text[..len].contains('=') && !text[len..].to_ascii_lowercase().contains(&close)
        }
        Some((Tag::Close(_), _)) => false,
    }
}

fn skip_close_tags(mut text: &str) -> &str {
    while let Some((Tag::Close(_), len)) = tag_at(text) {
        text = &text[len..];
    }
    text
}
