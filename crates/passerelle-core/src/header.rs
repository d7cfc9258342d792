//! Title ("Titre") and blurb ("Chapeau") prompt and parsing.

use serde::Serialize;

pub const TITLE_PREFIX: &str = "Titre :";
pub const BLURB_PREFIX: &str = "Chapeau :";

const HEADER_PROMPT: &str = "Tu es un assistant de rédaction pour un journal local français.

Ta tâche est de générer un **titre** et un **chapeau** (blurb) à partir du **premier paragraphe uniquement**.

Règles :

1. Titre :
   - Court, clair et journalistique (max. 12 mots).
   - Inclure le lieu si mentionné dans le paragraphe.
   - Inclure la date si mentionnée dans le paragraphe.
   - Doit annoncer le fait principal.

2. Chapeau :
   - Résume quoi, qui, où, quand.
   - Mentionner la date et le lieu s'ils sont dans le paragraphe.
   - Max. 30 mots, ton neutre.

Utilise uniquement le contenu du paragraphe fourni, sans rien ajouter.

Format de réponse :
Titre : [titre généré]
Chapeau : [chapeau généré]
";

/// A parsed title/blurb pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderResult {
    pub title: String,
    pub blurb: String,
}

impl HeaderResult {
    /// Extract the first `Titre :` and `Chapeau :` lines from `text`.
    ///
    /// Returns `None` unless both are present.
    pub fn parse(text: &str) -> Option<Self> {
        let title = find_prefixed(text, TITLE_PREFIX)?;
        let blurb = find_prefixed(text, BLURB_PREFIX)?;
        Some(Self { title, blurb })
    }

    /// Format back to the two-line textual shape.
    pub fn to_text(&self) -> String {
        format!("{} {}\n{} {}", TITLE_PREFIX, self.title, BLURB_PREFIX, self.blurb)
    }
}

fn find_prefixed(text: &str, prefix: &str) -> Option<String> {
    text.lines()
        .map(str::trim_start)
        .find_map(|line| line.strip_prefix(prefix))
        .map(|rest| rest.trim().to_string())
}

/// Whether `text` already has the `Titre :` / `Chapeau :` shape.
pub fn looks_like_header(text: &str) -> bool {
    text.contains(TITLE_PREFIX) && text.contains(BLURB_PREFIX)
}

/// Build the header prompt for the first segment of an article.
pub fn build_header_prompt(first_segment: &str) -> String {
    format!("{}\n\nParagraphe:\n{}", HEADER_PROMPT, first_segment.trim())
}

/// Synthetic header naming a failure, used when generation cannot produce one.
pub fn failure_header(title: &str, blurb: &str) -> String {
    HeaderResult {
        title: title.to_string(),
        blurb: blurb.to_string(),
    }
    .to_text()
}
