//! Title and blurb generation for the first segment of an article.
//!
//! A single attempt, no retries. Every failure is folded into a synthetic
//! `Titre :` / `Chapeau :` pair whose blurb names what went wrong, so the
//! caller always gets displayable text.

use std::time::Duration;
use tracing::{error, warn};

use passerelle_core::header::{build_header_prompt, failure_header, looks_like_header};
use passerelle_core::response::ResponseShape;

use crate::config::HeaderConfig;
use crate::endpoint::{CallError, CompletionEndpoint, CompletionRequest};

/// Generate the header text for `first_segment`.
pub async fn generate_header<E: CompletionEndpoint + ?Sized>(
    endpoint: &E,
    config: &HeaderConfig,
    first_segment: &str,
) -> String {
    let request = CompletionRequest {
        prompt: build_header_prompt(first_segment),
        temperature: config.temperature,
        timeout: Duration::from_secs(config.timeout_secs),
    };

    let body = match endpoint.complete(&request).await {
        Ok(body) => body,
        Err(e) => {
            if let CallError::Unexpected(ref msg) = e {
                error!(error = %msg, "unexpected header generation failure");
            } else {
                warn!(error = %e, "header generation failed");
            }
            return call_failure_header(&e);
        }
    };

    match ResponseShape::from_body(&body) {
        Ok(shape) if shape.is_unknown() => {
            warn!("header response has no recognised text field");
            failure_header(
                "Format de réponse incorrect",
                "La réponse de l'API ne contient aucun champ de texte reconnu \
                 (response, choices, generations, output).",
            )
        }
        Ok(shape) => shape.text().trim().to_string(),
        Err(_) if looks_like_header(&body) => body.trim().to_string(),
        Err(e) => {
            warn!(error = %e, "header response is not JSON");
            failure_header(
                "Erreur de format JSON",
                "La réponse de l'API n'est pas un JSON valide.",
            )
        }
    }
}

fn call_failure_header(err: &CallError) -> String {
    match err {
        CallError::Status(code) => failure_header(
            &format!("Erreur API (code {})", code),
            "L'API a retourné une erreur. Vérifiez l'URL et que le service est en cours d'exécution.",
        ),
        CallError::Connect(_) => failure_header(
            "Erreur de connexion",
            "Impossible de se connecter à l'API. Vérifiez l'URL et que le service est en cours d'exécution.",
        ),
        CallError::Timeout => failure_header(
            "Délai d'attente dépassé",
            "L'API n'a pas répondu dans le délai imparti. Le service peut être surchargé.",
        ),
        CallError::Unexpected(msg) => failure_header("Erreur technique", msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::testing::ScriptedEndpoint;
    use passerelle_core::header::HeaderResult;

    async fn header_for(script: Vec<Result<String, CallError>>) -> (String, ScriptedEndpoint) {
        let endpoint = ScriptedEndpoint::new(script);
        let text = generate_header(&endpoint, &HeaderConfig::default(), "  Premier paragraphe.  ").await;
        (text, endpoint)
    }

    #[tokio::test]
    async fn test_direct_response() {
        let (text, endpoint) = header_for(vec![ScriptedEndpoint::reply(
            "  Titre : Un titre\nChapeau : Un chapeau  ",
        )])
        .await;
        assert_eq!(text, "Titre : Un titre\nChapeau : Un chapeau");
        let requests = endpoint.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.ends_with("Paragraphe:\nPremier paragraphe."));
        assert!((requests[0].temperature - 0.5).abs() < 1e-6);
        assert_eq!(requests[0].timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_chat_completion_shape() {
        let body = serde_json::json!({
            "choices": [{"message": {"content": "Titre : T\nChapeau : C"}}]
        })
        .to_string();
        let (text, _) = header_for(vec![Ok(body)]).await;
        assert_eq!(HeaderResult::parse(&text).unwrap().title, "T");
    }

    #[tokio::test]
    async fn test_raw_text_body_accepted() {
        let (text, _) = header_for(vec![Ok("Titre : Brut\nChapeau : Texte brut\n".to_string())]).await;
        assert_eq!(text, "Titre : Brut\nChapeau : Texte brut");
    }

    #[tokio::test]
    async fn test_single_attempt_only() {
        let (text, endpoint) = header_for(vec![
            Err(CallError::Status(503)),
            ScriptedEndpoint::reply("Titre : jamais\nChapeau : jamais"),
        ])
        .await;
        assert_eq!(endpoint.calls(), 1);
        let parsed = HeaderResult::parse(&text).unwrap();
        assert_eq!(parsed.title, "Erreur API (code 503)");
    }

    #[tokio::test]
    async fn test_failures_are_named() {
        let cases = vec![
            (Err(CallError::Connect("refused".into())), "Erreur de connexion"),
            (Err(CallError::Timeout), "Délai d'attente dépassé"),
            (Ok("<html>502</html>".to_string()), "Erreur de format JSON"),
            (Ok(r#"{"data": 1}"#.to_string()), "Format de réponse incorrect"),
            (Err(CallError::Unexpected("tls".into())), "Erreur technique"),
        ];
        for (result, expected_title) in cases {
            let (text, _) = header_for(vec![result]).await;
            let parsed = HeaderResult::parse(&text).unwrap();
            assert_eq!(parsed.title, expected_title);
            assert!(!parsed.blurb.is_empty());
        }
    }

    #[tokio::test]
    async fn test_unexpected_failure_carries_message() {
        let (text, _) = header_for(vec![Err(CallError::Unexpected("certificat invalide".into()))]).await;
        assert_eq!(HeaderResult::parse(&text).unwrap().blurb, "certificat invalide");
    }
}
