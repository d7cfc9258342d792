//! Response-shape decoding for the generation endpoint.
//!
//! Endpoints in the wild answer with one of several JSON layouts. Rather
//! than probing fields ad hoc, [`ResponseShape::decode`] classifies a
//! payload into a closed set of variants, trying them in a fixed priority
//! order:
//!
//! | Priority | Variant | Payload |
//! |----------|---------|---------|
//! | 1 | [`Direct`](ResponseShape::Direct) | `{"response": "..."}` |
//! | 2 | [`ChatCompletion`](ResponseShape::ChatCompletion) | `{"choices": [{"message": {"content": "..."}}]}` |
//! | 3 | [`Generations`](ResponseShape::Generations) | `{"generations": [{"text": "..."}]}` |
//! | 4 | [`Output`](ResponseShape::Output) | `{"output": "..."}` or `{"output": ["...", ...]}` |
//! | 5 | [`Bare`](ResponseShape::Bare) | `"..."` |
//! | 6 | [`Unknown`](ResponseShape::Unknown) | anything else |

use serde_json::Value;
use thiserror::Error;

/// A classified endpoint payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    Direct(String),
    ChatCompletion(String),
    Generations(String),
    Output(String),
    Bare(String),
    Unknown(Value),
}

/// Body could not be interpreted at all.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

impl ResponseShape {
    /// Classify a parsed JSON payload.
    pub fn decode(value: &Value) -> Self {
        if let Some(text) = value.get("response").and_then(Value::as_str) {
            return Self::Direct(text.to_string());
        }
        if let Some(text) = value
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
            return Self::ChatCompletion(text.to_string());
        }
        if let Some(text) = value.pointer("/generations/0/text").and_then(Value::as_str) {
            return Self::Generations(text.to_string());
        }
        if let Some(output) = value.get("output") {
            let text = output
                .as_str()
                .or_else(|| output.get(0).and_then(Value::as_str));
            if let Some(text) = text {
                return Self::Output(text.to_string());
            }
        }
        if let Some(text) = value.as_str() {
            return Self::Bare(text.to_string());
        }
        Self::Unknown(value.clone())
    }

    /// Parse a raw body and classify it.
    pub fn from_body(body: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::decode(&value))
    }

    /// The generated text. Unknown payloads are stringified whole.
    pub fn text(&self) -> String {
        match self {
            Self::Direct(t)
            | Self::ChatCompletion(t)
            | Self::Generations(t)
            | Self::Output(t)
            | Self::Bare(t) => t.clone(),
            Self::Unknown(v) => v.to_string(),
        }
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Direct(_) => "response",
            Self::ChatCompletion(_) => "choices",
            Self::Generations(_) => "generations",
            Self::Output(_) => "output",
            Self::Bare(_) => "bare",
            Self::Unknown(_) => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}
