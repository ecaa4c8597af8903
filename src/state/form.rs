//! The question form: question text plus one request lifecycle.
//!
//! DESIGN
//! ======
//! Overlapping submissions are refused rather than raced. `begin_submit`
//! fails with [`FormError::Busy`] while a call is in flight, and every
//! submission carries a ticket so a completion that does not belong to the
//! current call is rejected instead of overwriting newer state.
//!
//! `submit` runs the whole round trip while holding `&mut self`. If its
//! future is dropped mid-call, a guard moves the form to `Failed` so the
//! loading state cannot outlive the request.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use crate::net::api::AskBackend;
use crate::net::types::{AnswerResult, AskError};

use super::request::RequestState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("a question is already being answered")]
    Busy,
    #[error("submission {ticket} is no longer in flight")]
    StaleTicket { ticket: u64 },
}

/// Handle for an in-flight submission started with [`QueryForm::begin_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: u64,
    pub query: String,
}

#[derive(Debug, Default)]
pub struct QueryForm {
    question: String,
    state: RequestState,
    /// Ticket of the most recent submission; 0 before the first.
    ticket: u64,
}

impl QueryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Replace the question text. Does not touch the request state.
    pub fn update_question(&mut self, text: impl Into<String>) {
        self.question = text.into();
    }

    /// Enter `Loading` for the current question, discarding any previous
    /// answer or error.
    ///
    /// Empty questions are accepted and sent as-is.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Busy`] while another submission is in flight.
    pub fn begin_submit(&mut self) -> Result<Submission, FormError> {
        if self.is_loading() {
            return Err(FormError::Busy);
        }
        self.ticket += 1;
        self.state = RequestState::Loading;
        tracing::debug!(ticket = self.ticket, empty = self.question.is_empty(), "submission started");
        Ok(Submission { ticket: self.ticket, query: self.question.clone() })
    }

    /// Resolve the in-flight submission identified by `ticket`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::StaleTicket`] when `ticket` is not the submission
    /// currently loading; the state is left untouched.
    pub fn complete(&mut self, ticket: u64, outcome: Result<AnswerResult, AskError>) -> Result<(), FormError> {
        if !self.is_loading() || ticket != self.ticket {
            tracing::debug!(ticket, current = self.ticket, "dropping stale completion");
            return Err(FormError::StaleTicket { ticket });
        }
        match &outcome {
            Ok(result) => tracing::info!(
                ticket,
                sources = result.sources().map_or(0, <[String]>::len),
                confidence = result.confidence(),
                "answer received"
            ),
            Err(err) => tracing::warn!(ticket, kind = err.kind(), error = %err, "question failed"),
        }
        self.state = RequestState::resolved(outcome);
        Ok(())
    }

    /// Submit the current question through `backend` and wait for the outcome.
    ///
    /// Returns the resolved state, which is always `Succeeded` or `Failed`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Busy`] if a split submission started with
    /// [`QueryForm::begin_submit`] is still in flight.
    pub async fn submit<B>(&mut self, backend: &B) -> Result<&RequestState, FormError>
    where
        B: AskBackend + ?Sized,
    {
        let submission = self.begin_submit()?;
        let guard = LoadingGuard { form: &mut *self, ticket: submission.ticket, settled: false };
        let outcome = backend.ask(&submission.query).await;
        guard.settle(outcome)?;
        Ok(&self.state)
    }
}

/// Resolves an abandoned submission as cancelled when dropped unsettled.
struct LoadingGuard<'a> {
    form: &'a mut QueryForm,
    ticket: u64,
    settled: bool,
}

impl LoadingGuard<'_> {
    fn settle(mut self, outcome: Result<AnswerResult, AskError>) -> Result<(), FormError> {
        self.settled = true;
        self.form.complete(self.ticket, outcome)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if self.form.complete(self.ticket, Err(AskError::Cancelled)).is_err() {
            tracing::debug!(ticket = self.ticket, "cancelled submission was already resolved");
        }
    }
}
