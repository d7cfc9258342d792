//! Prompt construction for connective generation.
//!
//! The prompt is plain text sent as `{"prompt": ...}`. It carries the rule
//! preamble, the connectives already produced in this run, up to
//! [`FEW_SHOT_COUNT`] sampled examples, and the two segments around the
//! marker.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::ExamplePair;
use crate::text::word_count;
use crate::CONNECTIVE_WORDS;

/// Default number of few-shot examples embedded in each prompt.
pub const FEW_SHOT_COUNT: usize = 3;

const RULE_PREAMBLE: &str = "Tu es un assistant de presse francophone spécialisé dans la création de transitions. \
Ta tâche est de produire UNE TRANSITION DE 5 MOTS EXACTEMENT entre deux paragraphes.\n\n\
🔴 RÈGLE PRINCIPALE ET ABSOLUE 🔴\n\
• LA TRANSITION DOIT CONTENIR EXACTEMENT 5 MOTS (NI PLUS, NI MOINS)\n\n\
EXEMPLES DE TRANSITIONS CORRECTES À 5 MOTS :\n\
• 'Passons maintenant au point suivant'\n\
• 'Cette situation mérite notre attention'\n\
• 'À présent, examinons autre chose'\n\
• 'Ces développements changent la donne'\n\
• 'Dans ce contexte, précisons que'\n\n\
RÈGLES SECONDAIRES :\n\
• Éviter les répétitions de mots\n\
• Ne jamais réutiliser une transition précédente\n\
• Éviter d'utiliser toujours 'Par ailleurs' ou 'En parallèle'\n\n\
INSTRUCTIONS POUR LA DERNIÈRE TRANSITION :\n\
Pour la dernière transition uniquement, utiliser une formule conclusive en 5 mots exactement.\n\n\
🔢 COMPTE TES MOTS AVANT DE RÉPONDRE\n\
TA RÉPONSE DOIT ÊTRE UNE PHRASE DE 5 MOTS, RIEN D'AUTRE.";

const CLOSING_REMINDER: &str = "Ta réponse doit être UNE transition de EXACTEMENT 5 MOTS.";

/// Appended to the prompt on every retry.
pub const RETRY_EMPHASIS: &str = "\n\nTrès important: Ta réponse doit être EXACTEMENT 5 mots.";

/// Sample up to `count` examples without replacement.
///
/// Examples whose connective is exactly five words are preferred; when
/// fewer than `count` of those exist the whole dataset is sampled instead.
pub fn select_examples<'a, R: Rng + ?Sized>(
    rng: &mut R,
    examples: &'a [ExamplePair],
    count: usize,
) -> Vec<&'a ExamplePair> {
    let five_word: Vec<&ExamplePair> = examples
        .iter()
        .filter(|ex| word_count(&ex.connective) == CONNECTIVE_WORDS)
        .collect();

    if five_word.len() >= count {
        five_word.choose_multiple(rng, count).copied().collect()
    } else {
        let all: Vec<&ExamplePair> = examples.iter().collect();
        all.choose_multiple(rng, count.min(all.len()))
            .copied()
            .collect()
    }
}

/// Build the connective-generation prompt for the marker between
/// `segment_a` and `segment_b`.
pub fn build_connective_prompt(
    examples: &[&ExamplePair],
    previous: &[String],
    segment_a: &str,
    segment_b: &str,
) -> String {
    let mut prompt = String::from(RULE_PREAMBLE);

    if !previous.is_empty() {
        prompt.push_str("\n\nTRANSITIONS DÉJÀ UTILISÉES (À NE PAS RÉPÉTER) :\n");
        for (i, t) in previous.iter().enumerate() {
            prompt.push_str(&format!("{}. '{}'\n", i + 1, t));
        }
    }

    if !examples.is_empty() {
        prompt.push_str("\n\nEXEMPLES :\n");
        for ex in examples {
            prompt.push_str(&format!(
                "Contexte : {}\nTransition : {}\n\n",
                ex.context, ex.connective
            ));
        }
    }

    prompt.push_str(&format!(
        "\nParagraphe A :\n{}\n\nParagraphe B :\n{}\n\n",
        segment_a.trim(),
        segment_b.trim()
    ));
    prompt.push_str(CLOSING_REMINDER);
    prompt
}

/// Prompt for a given attempt: retries carry [`RETRY_EMPHASIS`].
pub fn prompt_for_attempt(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}{}", base, RETRY_EMPHASIS)
    }
}

/// Sampling temperature for a 0-based attempt, lowered on each retry and
/// floored at zero.
pub fn temperature_for_attempt(base: f32, step: f32, attempt: u32) -> f32 {
    (base - step * attempt as f32).max(0.0)
}
