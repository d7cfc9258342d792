//! Transport to the external text-generation endpoint.
//!
//! [`CompletionEndpoint`] is the seam between the generation logic and the
//! network: the generation client and header generator only see a raw
//! response body or a [`CallError`]. [`HttpEndpoint`] is the production
//! implementation over `reqwest`.
//!
//! # Wire format
//!
//! ```text
//! POST <API_URL>
//! Authorization: Bearer <API_TOKEN>
//! Content-Type: application/json
//!
//! {"prompt": "...", "temperature": 0.7}
//! ```
//!
//! Only a `200 OK` counts as success; the body is returned untouched for
//! shape decoding by the caller.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::config::Credentials;

/// One request to the endpoint.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Why a call produced no body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("endpoint returned status {0}")]
    Status(u16),
    /// Anything not covered above. Logged at error level by callers.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

/// Sends prompts to a text-generation backend.
#[async_trait]
pub trait CompletionEndpoint: Send + Sync {
    /// Issue one request and return the raw body of a successful response.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CallError>;
}

/// [`CompletionEndpoint`] over HTTP with bearer authentication.
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl HttpEndpoint {
    pub fn new(credentials: &Credentials) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            url: credentials.url.clone(),
            token: credentials.token.clone(),
        })
    }
}

#[async_trait]
impl CompletionEndpoint for HttpEndpoint {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CallError> {
        let body = serde_json::json!({
            "prompt": request.prompt,
            "temperature": request.temperature,
        });

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CallError::Status(status.as_u16()));
        }

        response.text().await.map_err(classify)
    }
}

fn classify(err: reqwest::Error) -> CallError {
    if err.is_timeout() {
        CallError::Timeout
    } else if err.is_connect() {
        CallError::Connect(err.to_string())
    } else {
        CallError::Unexpected(err.to_string())
    }
}
