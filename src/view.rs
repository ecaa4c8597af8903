//! Render contract for the question form.
//!
//! `render` maps a [`QueryForm`] to a [`FormView`]: the submit control plus
//! exactly one body (nothing, an error, or an answer). `Display` draws it as
//! plain text for the terminal front end.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::fmt;

use crate::net::types::AnswerResult;
use crate::state::form::QueryForm;
use crate::state::request::RequestState;

pub const SUBMIT_LABEL: &str = "Submit";
pub const PROGRESS_INDICATOR: &str = "...";

/// What the submit control shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonContent {
    Label,
    Progress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitButton {
    pub disabled: bool,
    pub content: ButtonContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerView<'a> {
    pub answer: &'a str,
    /// Rounded percentage, e.g. `87%`.
    pub confidence: Option<String>,
    /// Sources joined with `", "`.
    pub sources: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody<'a> {
    /// Idle or loading.
    Empty,
    Error(&'a str),
    Answer(AnswerView<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView<'a> {
    pub question: &'a str,
    pub submit: SubmitButton,
    pub body: ViewBody<'a>,
}

pub fn render(form: &QueryForm) -> FormView<'_> {
    let loading = form.is_loading();
    let submit = SubmitButton {
        disabled: loading,
        content: if loading { ButtonContent::Progress } else { ButtonContent::Label },
    };
    let body = match form.state() {
        RequestState::Idle | RequestState::Loading => ViewBody::Empty,
        RequestState::Failed(message) => ViewBody::Error(message),
        RequestState::Succeeded(result) => ViewBody::Answer(answer_view(result)),
    };
    FormView { question: form.question(), submit, body }
}

fn answer_view(result: &AnswerResult) -> AnswerView<'_> {
    AnswerView {
        answer: result.answer(),
        confidence: result.confidence().map(format_confidence),
        sources: result.sources().filter(|s| !s.is_empty()).map(format_sources),
    }
}

/// `0.873` -> `87%`. Halves round up; `-0.0` prints as `0%`.
pub fn format_confidence(confidence: f64) -> String {
    // `+ 0.0` turns a negative zero positive so `{:.0}` never prints `-0`.
    let percent = (confidence * 100.0).round() + 0.0;
    format!("{percent:.0}%")
}

pub fn format_sources(sources: &[String]) -> String {
    sources.join(", ")
}

impl fmt::Display for FormView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.submit.content {
            ButtonContent::Label => writeln!(f, "[ {SUBMIT_LABEL} ]")?,
            ButtonContent::Progress => writeln!(f, "[ {PROGRESS_INDICATOR} ] (disabled)")?,
        }
        match &self.body {
            ViewBody::Empty => Ok(()),
            ViewBody::Error(message) => writeln!(f, "Error: {message}"),
            ViewBody::Answer(view) => {
                writeln!(f, "Answer:")?;
                writeln!(f, "{}", view.answer)?;
                if let Some(confidence) = &view.confidence {
                    writeln!(f, "Confidence: {confidence}")?;
                }
                if let Some(sources) = &view.sources {
                    writeln!(f, "Sources: {sources}")?;
                }
                Ok(())
            }
        }
    }
}
