//! Example store: the few-shot `(input, transition)` dataset.

use anyhow::{Context, Result};
use std::path::Path;

use passerelle_core::models::ExamplePair;
use passerelle_core::text::word_count;
use passerelle_core::CONNECTIVE_WORDS;

/// Load the example dataset from a JSON array of `{input, transition}`
/// records. A missing key in any record fails the whole load.
pub fn load_examples(path: &Path) -> Result<Vec<ExamplePair>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read examples file: {}", path.display()))?;
    let examples: Vec<ExamplePair> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid examples file: {}", path.display()))?;
    tracing::debug!(count = examples.len(), path = %path.display(), "loaded examples");
    Ok(examples)
}

/// CLI entry point for `passerelle examples`.
pub fn run_examples(path: &Path) -> Result<()> {
    let examples = load_examples(path)?;
    let five_word = examples
        .iter()
        .filter(|ex| word_count(&ex.connective) == CONNECTIVE_WORDS)
        .count();

    println!("examples:          {}", path.display());
    println!("pairs:             {}", examples.len());
    println!("5-word connectives: {}", five_word);
    Ok(())
}
