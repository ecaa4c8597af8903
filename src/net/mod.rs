//! Networking for the single question/answer exchange.
//!
//! SYSTEM CONTEXT
//! ==============
//! `types` defines the wire schema and the error taxonomy, `api` performs the
//! HTTP call behind the `AskBackend` seam the form submits through.

pub mod api;
pub mod types;
