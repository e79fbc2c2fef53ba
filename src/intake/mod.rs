//! Job post and job application intake backed by the record store.

pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use router::submission_router;
pub use service::{retry_prompt, SubmissionError, SubmissionService};
