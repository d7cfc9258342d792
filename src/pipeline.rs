//! One generation run, end to end.
//!
//! ```text
//! text ──split──▶ segments ──┬─▶ header (segment 0)
//!                            └─▶ for each adjacent pair, in order:
//!                                  GenerationClient::generate(prev…)
//!                                        │
//!                                        ▼
//!                                repair_connectives ──▶ rebuild ──▶ RunReport
//! ```
//!
//! Connectives are generated strictly in document order because each
//! request lists the candidates produced before it.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, info_span, warn, Instrument};

use passerelle_core::header::HeaderResult;
use passerelle_core::layout::{rebuild, LayoutError};
use passerelle_core::models::{ExamplePair, Notice, NoticeLevel};
use passerelle_core::repair::repair_connectives;
use passerelle_core::text::split_segments;

use crate::config::Config;
use crate::endpoint::CompletionEndpoint;
use crate::generation::GenerationClient;
use crate::header::generate_header;

/// Run-level failures. Everything else degrades inside the run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The input holds no marker; nothing was sent to the endpoint.
    #[error("Aucune balise `{marker}` trouvée.")]
    MissingMarker { marker: String },
    /// Marker and connective counts disagree; no article is produced.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Everything a successful run produces.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Raw header text, as returned by the header generator.
    pub header: String,
    /// Parsed header, when the text has both expected lines.
    pub header_fields: Option<HeaderResult>,
    pub article: String,
    pub connectives: Vec<String>,
    pub notices: Vec<Notice>,
}

impl RunReport {
    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(|n| n.level == NoticeLevel::Error)
    }
}

/// Execute one run over `text`.
pub async fn run<E, R>(
    endpoint: &E,
    config: &Config,
    examples: &[ExamplePair],
    rng: &mut R,
    text: &str,
) -> Result<RunReport, RunError>
where
    E: CompletionEndpoint + ?Sized,
    R: Rng + ?Sized,
{
    let marker = config.document.marker.as_str();
    if !text.contains(marker) {
        return Err(RunError::MissingMarker {
            marker: marker.to_string(),
        });
    }

    let run_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!("run", run_id = %run_id);

    async move {
        let segments = split_segments(text, marker);
        info!(markers = segments.len() - 1, examples = examples.len(), "starting run");

        let header = generate_header(endpoint, &config.header, segments[0]).await;

        let client = GenerationClient::new(endpoint, config.generation.clone());
        let mut candidates: Vec<String> = Vec::with_capacity(segments.len() - 1);
        for (i, pair) in segments.windows(2).enumerate() {
            let candidate = client
                .generate(rng, pair[0], pair[1], examples, &candidates)
                .await;
            info!(index = i + 1, candidate = %candidate, "candidate generated");
            candidates.push(candidate);
        }

        let repaired = repair_connectives(rng, &candidates);
        for notice in &repaired.notices {
            match notice.level {
                NoticeLevel::Error => error!(notice = %notice.message, "repair"),
                NoticeLevel::Warning => warn!(notice = %notice.message, "repair"),
                NoticeLevel::Info => info!(notice = %notice.message, "repair"),
            }
        }

        let article = rebuild(text, marker, &repaired.connectives)?;
        info!(connectives = repaired.connectives.len(), "run complete");

        Ok(RunReport {
            run_id,
            generated_at: chrono::Utc::now().to_rfc3339(),
            version: None,
            header_fields: HeaderResult::parse(&header),
            header,
            article,
            connectives: repaired.connectives,
            notices: repaired.notices,
        })
    }
    .instrument(span)
    .await
}
