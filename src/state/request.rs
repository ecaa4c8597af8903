#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use crate::net::types::{AnswerResult, AskError};

/// What the form currently displays. Exactly one variant is live, so the
/// loading, error, and result views cannot overlap.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A submission is in flight.
    Loading,
    /// The last submission returned a readable answer.
    Succeeded(AnswerResult),
    /// The last submission failed; holds the message shown to the user.
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn answer(&self) -> Option<&AnswerResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Terminal state for a resolved call.
    pub fn resolved(outcome: Result<AnswerResult, AskError>) -> Self {
        match outcome {
            Ok(result) => Self::Succeeded(result),
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}
