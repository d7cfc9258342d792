//! Word-level helpers: candidate cleaning, word counting, segment splitting.

/// Characters stripped from both ends of a candidate.
pub const BOUNDING_CHARS: &[char] = &[
    '.', ',', ';', ':', '"', '\'', '!', '?', '(', ')', '-', '«', '»', '“', '”', '‘', '’',
];

/// Split `text` on the literal `marker`, yielding every segment in order.
///
/// A document with `n` markers always yields `n + 1` segments, some of
/// which may be empty.
pub fn split_segments<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    text.split(marker).collect()
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Strip bounding punctuation and whitespace, then collapse inner whitespace
/// to single spaces.
///
/// ```rust
/// use passerelle_core::text::clean_candidate;
///
/// assert_eq!(clean_candidate("  « Passons  au point suivant. »\n"), "Passons au point suivant");
/// ```
pub fn clean_candidate(raw: &str) -> String {
    let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || BOUNDING_CHARS.contains(&c));
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `n` words of `text`, joined by single spaces.
pub fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}
