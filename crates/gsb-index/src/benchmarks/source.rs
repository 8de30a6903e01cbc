use std::collections::BTreeMap;

use async_trait::async_trait;

/// Flat metric-name to average map as delivered by a benchmark source.
///
/// A metric the source did not report is simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAverages {
    values: BTreeMap<String, f64>,
}

impl RawAverages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: impl Into<String>, value: f64) {
        self.values.insert(metric.into(), value);
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for RawAverages {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(metric, value)| (metric.into(), value))
                .collect(),
        }
    }
}

/// Remote or local provider of sectorial averages.
#[async_trait]
pub trait BenchmarkSource: Send + Sync {
    async fn fetch_averages(
        &self,
        sector: &str,
        size_bucket: &str,
    ) -> Result<RawAverages, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("benchmark transport failed: {0}")]
    Transport(String),
    #[error("benchmark source rejected the request: {0}")]
    Rejected(String),
    #[error("no benchmark cohort for {sector} / {size_bucket}")]
    NotFound { sector: String, size_bucket: String },
    #[error("benchmark payload malformed: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Source used when no benchmark backend is configured; every lookup falls back to defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredSource;

#[async_trait]
impl BenchmarkSource for UnconfiguredSource {
    async fn fetch_averages(
        &self,
        sector: &str,
        size_bucket: &str,
    ) -> Result<RawAverages, SourceError> {
        Err(SourceError::NotFound {
            sector: sector.to_string(),
            size_bucket: size_bucket.to_string(),
        })
    }
}
