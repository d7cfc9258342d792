//! Connective validation and repair.
//!
//! Turns the raw candidates of a run into accepted connectives: every one
//! exactly [`CONNECTIVE_WORDS`] words, no two identical. Repair runs in
//! three passes whose order matters:
//!
//! 1. **Duplicates.** Later occurrences of a repeated candidate are swapped
//!    for a variation from [`DUPLICATE_VARIATIONS`], round-robin by index.
//! 2. **Word count.** Long candidates are truncated and cleaned again,
//!    4- and 3-word ones padded, anything shorter replaced from
//!    [`SHORT_FILLERS`].
//! 3. **Audit.** Anything still off-length becomes [`CANONICAL_FALLBACK`];
//!    anything still duplicated gets a numbered sentence.
//!
//! The first pass runs before the second so that a replaced duplicate is
//! length-checked too.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::Notice;
use crate::text::{clean_candidate, first_words, word_count};
use crate::CONNECTIVE_WORDS;

/// Replacements for repeated candidates.
pub const DUPLICATE_VARIATIONS: [&str; 5] = [
    "À noter également ce fait",
    "Il faut aussi mentionner ceci",
    "Soulignons encore ce point important",
    "Précisons ce point très important",
    "Ajoutons cette information très essentielle",
];

/// Replacements for candidates of fewer than three words.
pub const SHORT_FILLERS: [&str; 5] = [
    "Comme on peut le constater",
    "Il faut bien le dire",
    "À ce stade, précisons que",
    "Dans ce contexte bien particulier",
    "Pour bien comprendre ce point",
];

/// Last-resort sentence for anything the word-count pass failed to fix.
pub const CANONICAL_FALLBACK: &str = "Passons maintenant au point suivant";

const PAD_LAST: &str = "maintenant";
const PAD_MIDDLE: &str = "notamment";
const PAD_TWO_WORDS: &str = "bien entendu";

/// Output of [`repair_connectives`].
#[derive(Debug, Clone, Default)]
pub struct Repaired {
    pub connectives: Vec<String>,
    pub notices: Vec<Notice>,
}

/// Validate and repair the raw candidates of one run, in document order.
pub fn repair_connectives<R: Rng + ?Sized>(rng: &mut R, candidates: &[String]) -> Repaired {
    let mut items: Vec<String> = candidates.iter().map(|c| clean_candidate(c)).collect();
    let mut notices = Vec::new();

    deduplicate(&mut items, &mut notices);
    fix_word_counts(rng, &mut items, &mut notices);
    audit(&mut items, &mut notices);

    Repaired {
        connectives: items,
        notices,
    }
}

fn deduplicate(items: &mut [String], notices: &mut Vec<Notice>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for item in items.iter() {
        let count = counts.entry(item.as_str()).or_insert(0);
        if *count == 0 {
            order.push(item.as_str());
        }
        *count += 1;
    }
    let repeated: Vec<String> = order
        .into_iter()
        .filter(|t| counts[t] > 1)
        .map(|t| format!("'{}'", t))
        .collect();
    if repeated.is_empty() {
        return;
    }
    notices.push(Notice::warning(format!(
        "Transitions répétées détectées : {}",
        repeated.join(", ")
    )));

    let mut seen: HashSet<String> = HashSet::new();
    for i in 0..items.len() {
        if seen.contains(&items[i]) {
            let variation = pick_variation(i, items);
            items[i] = variation.to_string();
        }
        seen.insert(items[i].clone());
    }
}

/// Round-robin from `index % len`, skipping variations already in use.
fn pick_variation(index: usize, items: &[String]) -> &'static str {
    let len = DUPLICATE_VARIATIONS.len();
    (0..len)
        .map(|k| DUPLICATE_VARIATIONS[(index + k) % len])
        .find(|v| !items.iter().any(|t| t.as_str() == *v))
        .unwrap_or(DUPLICATE_VARIATIONS[index % len])
}

fn pick_short_filler<R: Rng + ?Sized>(rng: &mut R, items: &[String]) -> &'static str {
    let unused: Vec<&'static str> = SHORT_FILLERS
        .iter()
        .copied()
        .filter(|f| !items.iter().any(|t| t.as_str() == *f))
        .collect();
    if let Some(filler) = unused.choose(rng) {
        return *filler;
    }
    SHORT_FILLERS[rng.gen_range(0..SHORT_FILLERS.len())]
}

fn fix_word_counts<R: Rng + ?Sized>(rng: &mut R, items: &mut [String], notices: &mut Vec<Notice>) {
    let last = items.len().saturating_sub(1);
    let mut invalid = Vec::new();

    for i in 0..items.len() {
        let n = word_count(&items[i]);
        if n == CONNECTIVE_WORDS {
            continue;
        }
        invalid.push(format!("Transition {} ({} mots) : '{}'", i + 1, n, items[i]));

        // Truncation can expose trailing punctuation, or a bare dash as the
        // fifth token; cleaning again may leave fewer than five words.
        let text = if n > CONNECTIVE_WORDS {
            clean_candidate(&first_words(&items[i], CONNECTIVE_WORDS))
        } else {
            items[i].clone()
        };
        let repaired = match word_count(&text) {
            CONNECTIVE_WORDS => text,
            4 => {
                let pad = if i == last { PAD_LAST } else { PAD_MIDDLE };
                format!("{} {}", text, pad)
            }
            3 => format!("{} {}", text, PAD_TWO_WORDS),
            _ => pick_short_filler(rng, items).to_string(),
        };

        let verb = if n > CONNECTIVE_WORDS {
            "raccourcie"
        } else {
            "complétée"
        };
        notices.push(Notice::info(format!(
            "Transition {} {} à 5 mots : '{}'",
            i + 1,
            verb,
            repaired
        )));
        items[i] = repaired;
    }

    if !invalid.is_empty() {
        notices.push(Notice::warning(format!(
            "Transitions qui ne respectaient pas la règle de 5 mots : {}",
            invalid.join(", ")
        )));
    }
}

fn audit(items: &mut [String], notices: &mut Vec<Notice>) {
    for (i, item) in items.iter_mut().enumerate() {
        let n = word_count(item);
        if n != CONNECTIVE_WORDS {
            notices.push(Notice::error(format!(
                "La transition {} a toujours {} mots après correction",
                i + 1,
                n
            )));
            *item = CANONICAL_FALLBACK.to_string();
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    for i in 0..items.len() {
        if seen.contains(&items[i]) {
            let mut n = i + 1;
            let replacement = loop {
                let candidate = format!("Abordons maintenant le point {}", n);
                if !items.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            notices.push(Notice::error(format!(
                "La transition {} restait en double, remplacée par '{}'",
                i + 1,
                replacement
            )));
            items[i] = replacement;
        }
        seen.insert(items[i].clone());
    }
}
