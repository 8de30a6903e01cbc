use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::AssessmentRequest;
use super::service::AssessmentService;
use super::submission::SubmissionSink;
use crate::error::AppError;

/// Router builder exposing scoring, schema listing, and benchmark lookup.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: SubmissionSink + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(assess_handler::<S>))
        .route("/api/v1/schemas", get(schemas_handler::<S>))
        .route(
            "/api/v1/benchmarks/:sector/:size_bucket",
            get(benchmarks_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn assess_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    S: SubmissionSink + 'static,
{
    match service.assess(request).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn schemas_handler<S>(State(service): State<Arc<AssessmentService<S>>>) -> Response
where
    S: SubmissionSink + 'static,
{
    let payload = json!({
        "default_version": service.default_version(),
        "schemas": service.schemas(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn benchmarks_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path((sector, size_bucket)): Path<(String, String)>,
) -> Response
where
    S: SubmissionSink + 'static,
{
    let resolution = service.resolver().resolve(&sector, &size_bucket).await;
    let payload = json!({
        "benchmark_available": !resolution.is_default_record(),
        "resolution": resolution,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
