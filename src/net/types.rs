//! Wire DTOs for the `/ask` exchange and the errors it can produce.
//!
//! DESIGN
//! ======
//! Backends in the field answer with three payload shapes: the earliest sends
//! only `answer`, a later one names a single `source` document, and the
//! current one sends a `source` list plus a `confidence` score. `AnswerPayload`
//! accepts all of them and `AnswerResult` is the normalized form the UI keeps.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Failure of one remote call. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AskError {
    /// The request never produced a response: connection refused, DNS,
    /// reset, or the body could not be read.
    #[error("Could not reach the answer service: {0}")]
    Transport(String),

    /// The configured request timeout elapsed.
    #[error("The answer service did not respond in time.")]
    Timeout,

    /// A response arrived with a status outside 200-299. The status is kept
    /// for logs, not shown.
    #[error("Failed to fetch answer from the server.")]
    Status { status: u16 },

    /// A 2xx body that does not match the expected answer shape.
    #[error("The server sent a response that could not be read: {0}")]
    Parse(String),

    /// The in-flight call was dropped before it resolved.
    #[error("The request was cancelled before an answer arrived.")]
    Cancelled,

    /// The HTTP client could not be constructed.
    #[error("HTTP client could not be created: {0}")]
    ClientBuild(String),
}

impl AskError {
    /// Short stable tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Timeout => "timeout",
            Self::Status { .. } => "status",
            Self::Parse(_) => "parse",
            Self::Cancelled => "cancelled",
            Self::ClientBuild(_) => "client_build",
        }
    }

    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() { Self::Timeout } else { Self::Transport(err.to_string()) }
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// Body of `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest<'a> {
    pub query: &'a str,
}

// =============================================================================
// RESPONSE
// =============================================================================

/// `source` is a single document name on older backends and a list on
/// newer ones.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SourceField {
    One(String),
    Many(Vec<String>),
}

impl SourceField {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
    }
}

/// Raw success body as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerPayload {
    pub answer: String,
    #[serde(default, alias = "sources")]
    pub source: Option<SourceField>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Parsed answer held by a succeeded form. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    answer: String,
    sources: Option<Vec<String>>,
    confidence: Option<f64>,
}

impl AnswerResult {
    /// # Errors
    ///
    /// Returns [`AskError::Parse`] when `confidence` is outside `[0, 1]`.
    pub fn new(answer: impl Into<String>, sources: Option<Vec<String>>, confidence: Option<f64>) -> Result<Self, AskError> {
        if let Some(score) = confidence {
            if !(0.0..=1.0).contains(&score) {
                return Err(AskError::Parse(format!("confidence {score} is outside [0, 1]")));
            }
        }
        Ok(Self { answer: answer.into(), sources, confidence })
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn sources(&self) -> Option<&[String]> {
        self.sources.as_deref()
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }
}

impl TryFrom<AnswerPayload> for AnswerResult {
    type Error = AskError;

    fn try_from(payload: AnswerPayload) -> Result<Self, Self::Error> {
        Self::new(payload.answer, payload.source.map(SourceField::into_vec), payload.confidence)
    }
}

/// Parse a 2xx body into an [`AnswerResult`].
///
/// # Errors
///
/// Returns [`AskError::Parse`] for anything that is not a JSON object with a
/// string `answer` and in-range optional fields.
pub fn parse_answer(body: &str) -> Result<AnswerResult, AskError> {
    let payload: AnswerPayload = serde_json::from_str(body).map_err(|e| AskError::Parse(e.to_string()))?;
    AnswerResult::try_from(payload)
}

/// Body of `GET /` on the reference backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RootMessage {
    pub message: String,
}
