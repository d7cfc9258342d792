//! Connective generation with retry and deterministic fallback.
//!
//! One call to [`GenerationClient::generate`] produces the candidate for a
//! single marker. The client never fails: transport errors, bad statuses,
//! undecodable bodies and empty answers are retried with a lower
//! temperature and an emphasised prompt, and when every attempt is spent
//! it returns a fixed five-word fallback.
//!
//! # Retry strategy
//!
//! | Outcome | Action |
//! |---------|--------|
//! | ≥ 5 words | return immediately |
//! | 1–4 words | remember as best-so-far, retry |
//! | empty / undecodable / non-200 / timeout / connect | retry |
//! | attempts exhausted | best-so-far, else fallback |

use rand::Rng;
use std::time::Duration;
use tracing::{debug, error, warn};

use passerelle_core::fallback::fallback_connective;
use passerelle_core::models::ExamplePair;
use passerelle_core::prompt::{
    build_connective_prompt, prompt_for_attempt, select_examples, temperature_for_attempt,
};
use passerelle_core::response::ResponseShape;
use passerelle_core::text::{clean_candidate, word_count};
use passerelle_core::CONNECTIVE_WORDS;

use crate::config::GenerationConfig;
use crate::endpoint::{CallError, CompletionEndpoint, CompletionRequest};

/// Produces raw connective candidates through a [`CompletionEndpoint`].
pub struct GenerationClient<'a, E: CompletionEndpoint + ?Sized> {
    endpoint: &'a E,
    config: GenerationConfig,
}

impl<'a, E: CompletionEndpoint + ?Sized> GenerationClient<'a, E> {
    pub fn new(endpoint: &'a E, config: GenerationConfig) -> Self {
        Self { endpoint, config }
    }

    /// Generate the candidate for the marker between `segment_a` and
    /// `segment_b`, steering away from the `previous` candidates of the run.
    pub async fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        segment_a: &str,
        segment_b: &str,
        examples: &[ExamplePair],
        previous: &[String],
    ) -> String {
        let selected = select_examples(rng, examples, self.config.few_shot);
        let base_prompt = build_connective_prompt(&selected, previous, segment_a, segment_b);
        let mut best_short: Option<String> = None;

        for attempt in 0..self.config.max_attempts {
            let request = CompletionRequest {
                prompt: prompt_for_attempt(&base_prompt, attempt),
                temperature: temperature_for_attempt(
                    self.config.base_temperature,
                    self.config.temperature_step,
                    attempt,
                ),
                timeout: Duration::from_secs(self.config.timeout_secs),
            };

            let body = match self.endpoint.complete(&request).await {
                Ok(body) => body,
                Err(CallError::Unexpected(msg)) => {
                    error!(attempt = attempt + 1, error = %msg, "unexpected generation failure");
                    continue;
                }
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, "generation call failed");
                    continue;
                }
            };

            let shape = match ResponseShape::from_body(&body) {
                Ok(shape) => shape,
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, "invalid response format");
                    continue;
                }
            };
            if shape.is_unknown() {
                warn!(attempt = attempt + 1, "unrecognised response shape, using raw payload");
            }

            let candidate = clean_candidate(&shape.text());
            let words = word_count(&candidate);
            if words >= CONNECTIVE_WORDS {
                return candidate;
            }
            if words > 0 {
                debug!(attempt = attempt + 1, words, candidate = %candidate, "short candidate");
                best_short = Some(candidate);
            } else {
                warn!(attempt = attempt + 1, "empty candidate");
            }
        }

        match best_short {
            Some(candidate) => candidate,
            None => {
                let fallback = fallback_connective(segment_b);
                warn!(fallback, "all generation attempts failed, using fallback");
                fallback.to_string()
            }
        }
    }
}
