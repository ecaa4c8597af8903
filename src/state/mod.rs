//! Form state.
//!
//! DESIGN
//! ======
//! `request` holds the four-way request lifecycle as a single enum, `form`
//! owns one of them together with the question text and drives transitions.

pub mod form;
pub mod request;
