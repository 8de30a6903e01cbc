use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::assessment::{
    AssessmentRequest, AssessmentService, InMemorySubmissionSink, ScoreSubmission,
    SubmissionError, SubmissionSink,
};
use crate::benchmarks::{BenchmarkResolver, BenchmarkSource, RawAverages, SourceError};
use crate::scoring::{AnswerMap, SchemaVersion};

pub(super) const SECTOR: &str = "Manufactura";
pub(super) const SIZE: &str = "Pequeña";

/// Knows a single cohort; everything else is not found.
pub(super) struct SingleCohortSource;

#[async_trait]
impl BenchmarkSource for SingleCohortSource {
    async fn fetch_averages(
        &self,
        sector: &str,
        size_bucket: &str,
    ) -> Result<RawAverages, SourceError> {
        if sector != SECTOR || size_bucket != SIZE {
            return Err(SourceError::NotFound {
                sector: sector.to_string(),
                size_bucket: size_bucket.to_string(),
            });
        }
        Ok(SchemaVersion::SheetsV2
            .schema()
            .metric_names()
            .into_iter()
            .map(|metric| {
                let value = if metric == "estrategia_empresarial" {
                    52.95
                } else {
                    40.0
                };
                (metric, value)
            })
            .collect())
    }
}

pub(super) struct RejectingSink;

#[async_trait]
impl SubmissionSink for RejectingSink {
    async fn submit(&self, _submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        Err(SubmissionError::Rejected { status: 503 })
    }
}

pub(super) fn resolver() -> BenchmarkResolver {
    BenchmarkResolver::with_timeout(
        Arc::new(SingleCohortSource),
        SchemaVersion::SheetsV2.schema().metric_names(),
        Duration::from_secs(10),
    )
}

pub(super) fn build_service() -> (
    Arc<AssessmentService<InMemorySubmissionSink>>,
    InMemorySubmissionSink,
) {
    let sink = InMemorySubmissionSink::default();
    let service = AssessmentService::new(
        resolver(),
        Arc::new(sink.clone()),
        SchemaVersion::SheetsV2,
    )
    .expect("bundled schemas validate");
    (Arc::new(service), sink)
}

pub(super) fn strategy_answers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("P1", "q1-80"),
        ("P2", "q2-60"),
        ("p3.1-12.5", "on"),
        ("p3.4-12.5", "on"),
    ]
}

/// Full form response: company details, cohort, and the strategy answers.
pub(super) fn full_request() -> AssessmentRequest {
    let mut fields = strategy_answers();
    fields.extend([
        ("Email", "sostenibilidad@ejemplo.es"),
        ("Compañia", "Ejemplo SL"),
        ("Sector", SECTOR),
        ("Tamaño-de-tu-empresa", SIZE),
    ]);
    AssessmentRequest::new(fields.into_iter().collect::<AnswerMap>())
}

pub(super) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}
