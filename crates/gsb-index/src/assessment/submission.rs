use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::scoring::{RespondentProfile, ScoreResult};

/// Row forwarded to the results sheet after scoring: company details plus every unrounded metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub submitted_at: DateTime<Utc>,
    pub schema_version: String,
    #[serde(flatten)]
    pub profile: RespondentProfile,
    pub metrics: BTreeMap<String, f64>,
}

impl ScoreSubmission {
    pub fn new(
        schema_version: &str,
        profile: RespondentProfile,
        scores: &ScoreResult,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            submitted_at,
            schema_version: schema_version.to_string(),
            profile,
            metrics: scores.metrics(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission transport failed: {0}")]
    Transport(String),
    #[error("submission endpoint answered {status}")]
    Rejected { status: u16 },
}

impl From<reqwest::Error> for SubmissionError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Destination for computed results.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<(), SubmissionError>;
}

/// Posts submissions as JSON to a results endpoint.
#[derive(Debug, Clone)]
pub struct HttpSubmissionSink {
    client: Client,
    endpoint: String,
}

impl HttpSubmissionSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SubmissionSink for HttpSubmissionSink {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SubmissionError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemorySubmissionSink {
    submissions: Arc<Mutex<Vec<ScoreSubmission>>>,
}

impl InMemorySubmissionSink {
    pub fn submissions(&self) -> Vec<ScoreSubmission> {
        self.submissions
            .lock()
            .expect("submission mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl SubmissionSink for InMemorySubmissionSink {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        self.submissions
            .lock()
            .expect("submission mutex poisoned")
            .push(submission.clone());
        Ok(())
    }
}
