//! # qa-form
//!
//! Headless client for a question-answering backend. A `QueryForm` owns the
//! question text and a single `RequestState`, submits the question over one
//! JSON POST, and exposes a render function that turns the current state
//! into exactly one of the idle, loading, error, or result views.
//!
//! The `qa-form` binary drives the same form from the terminal.

pub mod config;
pub mod net;
pub mod state;
pub mod view;

pub use config::ClientConfig;
pub use net::api::{AskBackend, HttpBackend};
pub use net::types::{AnswerResult, AskError};
pub use state::form::{FormError, QueryForm, Submission};
pub use state::request::RequestState;
pub use view::{FormView, render};
