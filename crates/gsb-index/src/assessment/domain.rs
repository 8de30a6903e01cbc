use serde::{Deserialize, Serialize};

use crate::report::ScoreReport;
use crate::scoring::{AnswerMap, RespondentProfile, ScoreResult};

/// Inbound scoring request.
///
/// `sector` and `size_bucket` override the values carried in the answers themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bucket: Option<String>,
    #[serde(default)]
    pub answers: AnswerMap,
}

impl AssessmentRequest {
    pub fn new(answers: AnswerMap) -> Self {
        Self {
            answers,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Sent,
    /// The response lacks an email or company, so nothing was forwarded.
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentOutcome {
    pub schema_version: String,
    pub profile: RespondentProfile,
    pub scores: ScoreResult,
    pub report: ScoreReport,
    pub submission: SubmissionStatus,
}
