use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::benchmarks::{BenchmarkResolver, BenchmarkSource, RawAverages, SourceError};
use crate::scoring::SchemaVersion;

pub(super) const SECTOR: &str = "Manufactura";
pub(super) const SIZE: &str = "Pequeña";

pub(super) enum Reply {
    Averages(RawAverages),
    Fail,
    Panic,
}

/// Scripted source that counts calls and answers after a fixed delay.
pub(super) struct ScriptedSource {
    calls: AtomicUsize,
    delay: Duration,
    reply: Reply,
}

impl ScriptedSource {
    pub(super) fn new(reply: Reply, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay,
            reply,
        })
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BenchmarkSource for ScriptedSource {
    async fn fetch_averages(
        &self,
        _sector: &str,
        _size_bucket: &str,
    ) -> Result<RawAverages, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match &self.reply {
            Reply::Averages(raw) => Ok(raw.clone()),
            Reply::Fail => Err(SourceError::Transport("connection refused".to_string())),
            Reply::Panic => panic!("averages script crashed"),
        }
    }
}

pub(super) fn metric_names() -> Vec<String> {
    SchemaVersion::SheetsV2.schema().metric_names()
}

/// Reference averages published for the small manufacturing cohort.
pub(super) fn complete_averages() -> RawAverages {
    [
        ("impacto_climatico", 28.31),
        ("gestion_sostenible", 29.7),
        ("biodiversidad", 55.92),
        ("gestion_ambiental", 50.67),
        ("interno", 68.8),
        ("externo", 29.52),
        ("estrategia_empresarial", 52.95),
        ("eco_financiero", 48.64),
        ("proveedores", 48.4),
        ("codigo_etico", 36.76),
        ("media_ambiental", 41.15),
        ("media_social", 49.16),
        ("media_gobernanza", 46.6875),
        ("gsb_index_total", 45.66583333),
    ]
    .into_iter()
    .collect()
}

pub(super) fn resolver(source: Arc<ScriptedSource>, timeout: Duration) -> BenchmarkResolver {
    BenchmarkResolver::with_timeout(source, metric_names(), timeout)
}
