//! Message segmentation.
//!
//! Splits one raw message into an ordered list of independent task phrases
//! without breaking apart time expressions. Used by the fallback backend
//! and whenever remote segmentation fails.

use std::sync::LazyLock;

use regex::Regex;

/// Delimiter injected during separator normalization. Unit separator is
/// vanishingly unlikely in chat text; if present we fall back to the
/// record separator.
const DELIMITERS: [char; 2] = ['\u{1f}', '\u{1e}'];

static PUNCT_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;]\s*(\w)").expect("separator pattern"));

static CONJUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s(?:and|y|also|además)\s+(\w)").expect("conjunction pattern")
});

/// True when the piece looks like a fragment of a clock time: nothing but
/// digits once colons and dots are stripped.
fn is_time_fragment(piece: &str) -> bool {
    let stripped: String = piece.chars().filter(|c| *c != ':' && *c != '.').collect();
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
}

/// Splits `text` into non-empty phrases, each intended to become one
/// intent. Never reduces a non-empty input to zero segments.
pub fn segment(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let delimiter = DELIMITERS
        .iter()
        .copied()
        .find(|d| !text.contains(*d))
        .unwrap_or(DELIMITERS[0]);
    let delim_str = delimiter.to_string();

    let normalized = PUNCT_SEPARATOR_RE.replace_all(text, format!("{delim_str}$1"));
    let normalized = CONJUNCTION_RE.replace_all(&normalized, format!("{delim_str}$1"));

    let pieces = normalized
        .split(delimiter)
        .map(str::trim)
        .filter(|p| !p.is_empty());

    // Re-merge pieces that are both pure clock-time fragments: a comma
    // sitting inside or next to "10:30" must not leave "10" and "30" as
    // separate segments.
    let mut segments: Vec<String> = Vec::new();
    for piece in pieces {
        match segments.last_mut() {
            Some(last) if is_time_fragment(last) && is_time_fragment(piece) => {
                last.push_str(piece);
            }
            _ => segments.push(piece.to_string()),
        }
    }

    if segments.is_empty() {
        return vec![normalized.trim().to_string()];
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_task_is_one_segment() {
        assert_eq!(segment("This is a test."), vec!["This is a test."]);
    }

    #[test]
    fn test_split_on_commas() {
        let segments = segment("Buy milk, call mom, send email");
        assert_eq!(segments, vec!["Buy milk", "call mom", "send email"]);
    }

    #[test]
    fn test_split_on_spanish_y() {
        let segments = segment("Comprar leche y llamar a mamá y enviar email");
        assert_eq!(
            segments,
            vec!["Comprar leche", "llamar a mamá", "enviar email"]
        );
    }

    #[test]
    fn test_split_on_english_and() {
        let segments = segment("Buy milk and call mom and send email");
        assert_eq!(segments, vec!["Buy milk", "call mom", "send email"]);
    }

    #[test]
    fn test_mixed_multilingual_separators() {
        let segments = segment(
            "Buy milk y call mom, enviar email además schedule meeting and send report also create task",
        );
        assert_eq!(segments.len(), 6);
        for expected in [
            "Buy milk",
            "call mom",
            "enviar email",
            "schedule meeting",
            "send report",
            "create task",
        ] {
            assert!(
                segments.iter().any(|s| s.contains(expected)),
                "missing segment '{expected}' in {segments:?}"
            );
        }
    }

    #[test]
    fn test_preserves_time_expressions() {
        let segments = segment("Meeting at 10:30, call mom at 11:15");
        assert_eq!(segments, vec!["Meeting at 10:30", "call mom at 11:15"]);
    }

    #[test]
    fn test_merges_time_fragments() {
        // Purely numeric neighbors are clock-time fragments; they are
        // concatenated back instead of becoming bogus segments.
        assert_eq!(segment("10, 30"), vec!["1030"]);
    }

    #[test]
    fn test_words_are_preserved_in_order() {
        let text = "Buy milk and call mom, send email";
        let joined = segment(text).join(" ");
        let original_words: Vec<&str> = text
            .split_whitespace()
            .filter(|w| !matches!(w.trim_end_matches(','), "and" | "y" | "also" | "además"))
            .map(|w| w.trim_end_matches(','))
            .collect();
        let result_words: Vec<&str> = joined.split_whitespace().collect();
        assert_eq!(result_words, original_words);
    }

    #[test]
    fn test_non_empty_input_yields_segments() {
        for text in ["x", "hello world", "y", ", leading comma"] {
            assert!(!segment(text).is_empty(), "no segments for '{text}'");
        }
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(segment("").is_empty());
        assert!(segment("   ").is_empty());
    }

    #[test]
    fn test_inner_y_in_word_is_not_a_separator() {
        // "ayer" contains 'y' but must not be split.
        assert_eq!(segment("comprar ayer"), vec!["comprar ayer"]);
    }
}
