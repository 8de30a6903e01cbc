//! Assessment pipeline: score a response, compare it with its sector, forward the result.

pub mod domain;
pub mod router;
pub mod service;
pub mod submission;

#[cfg(test)]
mod tests;

pub use domain::{AssessmentOutcome, AssessmentRequest, SubmissionStatus};
pub use router::assessment_router;
pub use service::{AssessmentError, AssessmentService, SchemaSummary};
pub use submission::{
    HttpSubmissionSink, InMemorySubmissionSink, ScoreSubmission, SubmissionError, SubmissionSink,
};
