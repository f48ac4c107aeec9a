//! Agnostic text comparison.
//!
//! Voter names, plan names, tasks and vote content are compared ignoring
//! case, whitespace and punctuation, so `Flank left!` and `flank-left` are
//! the same vote.

/// Reduce text to its comparison form.
///
/// Keeps alphanumeric characters, lowercased. Text made only of symbols
/// keeps its symbols (minus whitespace) so that `???` and `!!!` stay distinct.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    if folded.is_empty() {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    } else {
        folded
    }
}

/// Compare two strings agnostically.
pub fn agnostic_eq(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ignores_case_and_punctuation() {
        assert_eq!(normalize("Flank Left!"), "flankleft");
        assert_eq!(normalize("  flank-left "), "flankleft");
    }

    #[test]
    fn test_agnostic_eq_names() {
        assert!(agnostic_eq("Kinematics", "kinematics"));
        assert!(agnostic_eq("Mr. Bean", "mr bean"));
        assert!(!agnostic_eq("Kinematics", "Kinetics"));
    }

    #[test]
    fn test_symbol_only_text_stays_distinct() {
        assert_eq!(normalize("? ? ?"), "???");
        assert!(!agnostic_eq("???", "!!!"));
    }

    #[test]
    fn test_unicode_letters_are_kept() {
        assert_eq!(normalize("Ünïcode Plan"), "ünïcodeplan");
        assert_eq!(normalize("日本 語"), "日本語");
    }
}
