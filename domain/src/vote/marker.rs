//! Vote markers: the `[x]`, `[1]`, `[75%]`, `[+]` token that opens a vote line.

use serde::{Deserialize, Serialize};

/// Kind of preference a marker expresses
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    /// No marker; acts as a wildcard when comparing blocks
    #[default]
    None,
    /// Plain support (`x`, `✓`, `☒`)
    Vote,
    /// Ordinal preference, 1 (best) to 9
    Rank,
    /// Percentage score, 0 to 100
    Score,
    /// Approval (`+`) or disapproval (`-`)
    Approval,
}

impl MarkerType {
    /// Whether two marker types may describe the same vote.
    ///
    /// `None` matches anything.
    pub fn is_compatible_with(self, other: MarkerType) -> bool {
        self == MarkerType::None || other == MarkerType::None || self == other
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MarkerType::None => "none",
            MarkerType::Vote => "vote",
            MarkerType::Rank => "rank",
            MarkerType::Score => "score",
            MarkerType::Approval => "approval",
        }
    }
}

impl std::fmt::Display for MarkerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const BALLOT_GLYPHS: [char; 2] = ['☒', '☑'];
const CHECK_SYMBOLS: [&str; 6] = ["x", "X", "✓", "✔", "✗", "✘"];

/// A parsed marker
///
/// `value` is 0–100 for Vote, Score and Approval markers and 1–9 for Rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Marker {
    symbol: String,
    kind: MarkerType,
    value: u8,
}

impl Marker {
    /// The empty marker carried by reference keys
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse the text between a marker's brackets.
    pub fn parse(token: &str) -> Option<Self> {
        let symbol = token.trim();
        if symbol.is_empty() {
            return None;
        }

        let (kind, value) = if CHECK_SYMBOLS.contains(&symbol) {
            (MarkerType::Vote, 100)
        } else if symbol.chars().count() == 1 && symbol.starts_with(BALLOT_GLYPHS) {
            (MarkerType::Vote, 100)
        } else if symbol == "+" {
            (MarkerType::Approval, 80)
        } else if symbol == "-" {
            (MarkerType::Approval, 20)
        } else if let Some(digits) = symbol.strip_prefix('#') {
            (MarkerType::Rank, parse_digits(digits)?.clamp(1, 9) as u8)
        } else if let Some(digits) = symbol.strip_suffix('%') {
            (MarkerType::Score, parse_digits(digits)?.min(100) as u8)
        } else {
            (MarkerType::Rank, parse_digits(symbol)?.clamp(1, 9) as u8)
        };

        Some(Self {
            symbol: symbol.to_string(),
            kind,
            value,
        })
    }

    /// A bracket-free ballot box glyph (`☒` or `☑`)
    pub fn glyph(c: char) -> Option<Self> {
        BALLOT_GLYPHS.contains(&c).then(|| Self {
            symbol: c.to_string(),
            kind: MarkerType::Vote,
            value: 100,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn kind(&self) -> MarkerType {
        self.kind
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn is_none(&self) -> bool {
        self.kind == MarkerType::None
    }

    fn is_bare_glyph(&self) -> bool {
        self.symbol.chars().count() == 1 && self.symbol.starts_with(BALLOT_GLYPHS)
    }
}

/// One to three ASCII digits
fn parse_digits(digits: &str) -> Option<u32> {
    if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_bare_glyph() {
            write!(f, "{}", self.symbol)
        } else {
            write!(f, "[{}]", self.symbol)
        }
    }
}
