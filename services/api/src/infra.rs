use async_trait::async_trait;
use gsb_index::assessment::{
    HttpSubmissionSink, InMemorySubmissionSink, ScoreSubmission, SubmissionError, SubmissionSink,
};
use gsb_index::benchmarks::{
    BenchmarkResolver, BenchmarkSource, CsvBenchmarkSource, HttpBenchmarkSource,
    UnconfiguredSource,
};
use gsb_index::config::{AppConfig, BenchmarkConfig};
use gsb_index::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Submission target picked from configuration: the results endpoint when set, memory otherwise.
pub(crate) enum ConfiguredSink {
    Http(HttpSubmissionSink),
    Memory(InMemorySubmissionSink),
}

#[async_trait]
impl SubmissionSink for ConfiguredSink {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        match self {
            ConfiguredSink::Http(sink) => sink.submit(submission).await,
            ConfiguredSink::Memory(sink) => sink.submit(submission).await,
        }
    }
}

pub(crate) fn build_sink(config: &AppConfig) -> ConfiguredSink {
    match &config.submission.endpoint {
        Some(endpoint) => {
            info!(%endpoint, "forwarding assessments to results endpoint");
            ConfiguredSink::Http(HttpSubmissionSink::new(endpoint.clone()))
        }
        None => ConfiguredSink::Memory(InMemorySubmissionSink::default()),
    }
}

/// Picks the benchmark source: remote URL, then CSV table (`csv_override` first), else none.
///
/// `required_metrics` are the metric names of the schema being scored; a cohort missing any of
/// them falls back to defaults.
pub(crate) fn build_resolver(
    config: &AppConfig,
    required_metrics: Vec<String>,
    csv_override: Option<&Path>,
) -> Result<BenchmarkResolver, AppError> {
    let source = benchmark_source(&config.benchmarks, csv_override)?;
    Ok(BenchmarkResolver::with_timeout(
        source,
        required_metrics,
        config.benchmarks.timeout,
    ))
}

fn benchmark_source(
    config: &BenchmarkConfig,
    csv_override: Option<&Path>,
) -> Result<Arc<dyn BenchmarkSource>, AppError> {
    if let Some(path) = csv_override {
        return Ok(Arc::new(CsvBenchmarkSource::from_path(path)?));
    }
    if let Some(url) = &config.remote_url {
        info!(%url, "using remote benchmark averages");
        return Ok(Arc::new(HttpBenchmarkSource::new(url.clone())));
    }
    if let Some(path) = &config.csv_path {
        let source = CsvBenchmarkSource::from_path(path)?;
        info!(path = %path.display(), cohorts = source.cohort_count(), "loaded benchmark table");
        return Ok(Arc::new(source));
    }
    info!("no benchmark source configured; comparisons use default figures");
    Ok(Arc::new(UnconfiguredSource))
}
