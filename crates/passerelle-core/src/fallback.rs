//! Deterministic fallback connectives used when generation yields nothing.

/// Used when the following segment looks like the end of the article.
pub const CLOSING_FALLBACK: &str = "Pour conclure cette analyse importante";

/// Used everywhere else.
pub const CONTINUATION_FALLBACK: &str = "Passons maintenant au point suivant";

/// Whether `segment` appears to close the document: its trimmed text ends
/// in terminal punctuation, so nothing but blank space follows the last
/// sentence.
///
/// This is a heuristic. A middle segment that ends with a full stop also
/// qualifies, and a single-marker document is judged the same way.
pub fn looks_final(segment: &str) -> bool {
    segment.trim_end().ends_with(['.', '!', '?'])
}

/// Fallback connective for a marker followed by `next_segment`.
pub fn fallback_connective(next_segment: &str) -> &'static str {
    if looks_final(next_segment) {
        CLOSING_FALLBACK
    } else {
        CONTINUATION_FALLBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::word_count;
    use crate::CONNECTIVE_WORDS;

    #[test]
    fn test_fallbacks_are_five_words() {
        assert_eq!(word_count(CLOSING_FALLBACK), CONNECTIVE_WORDS);
        assert_eq!(word_count(CONTINUATION_FALLBACK), CONNECTIVE_WORDS);
    }

    #[test]
    fn test_final_segment_gets_closing() {
        assert_eq!(fallback_connective(" Et voilà la fin.\n\n  "), CLOSING_FALLBACK);
        assert_eq!(fallback_connective("Vraiment ?"), CLOSING_FALLBACK);
    }

    #[test]
    fn test_open_segment_gets_continuation() {
        assert_eq!(fallback_connective(" La suite arrive"), CONTINUATION_FALLBACK);
        assert_eq!(fallback_connective(""), CONTINUATION_FALLBACK);
        assert_eq!(fallback_connective("   \n"), CONTINUATION_FALLBACK);
    }
}
