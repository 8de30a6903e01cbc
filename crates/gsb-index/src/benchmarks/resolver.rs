use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::record::{cohort_key, BenchmarkRecord};
use super::source::BenchmarkSource;

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a lookup ended on the default record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupFailure {
    #[error("benchmark lookup timed out after {seconds}s")]
    Timeout { seconds: u64 },
    #[error("benchmark transport failed: {message}")]
    Transport { message: String },
    #[error("benchmark response missing {}", .missing.join(", "))]
    Incomplete { missing: Vec<String> },
    #[error("benchmark lookup task aborted")]
    Aborted,
    #[error("no sector or size bucket supplied")]
    MissingCohort,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum BenchmarkOrigin {
    /// Served from the cache; `defaulted` marks a cached fallback record.
    Cache { defaulted: bool },
    Remote,
    Fallback { reason: LookupFailure },
}

/// Outcome of a resolution. The record is always usable; `origin` tells how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResolution {
    pub record: BenchmarkRecord,
    pub origin: BenchmarkOrigin,
    /// Set when the caller joined a lookup already in flight for the same cohort.
    pub shared: bool,
}

impl BenchmarkResolution {
    /// True when the record is the all-zero default rather than real sector data.
    pub fn is_default_record(&self) -> bool {
        matches!(
            self.origin,
            BenchmarkOrigin::Fallback { .. } | BenchmarkOrigin::Cache { defaulted: true }
        )
    }
}

type PendingLookup = Shared<BoxFuture<'static, BenchmarkResolution>>;

enum Slot {
    Ready {
        record: BenchmarkRecord,
        defaulted: bool,
    },
    Pending(PendingLookup),
}

struct ResolverState {
    source: Arc<dyn BenchmarkSource>,
    required_metrics: Vec<String>,
    timeout: Duration,
    slots: Mutex<HashMap<String, Slot>>,
}

/// Process-lifetime benchmark cache with single-flight lookups.
///
/// At most one remote lookup runs per cohort. Concurrent callers for the same cohort await the
/// same lookup, and every outcome (remote or default) is cached and never invalidated.
#[derive(Clone)]
pub struct BenchmarkResolver {
    state: Arc<ResolverState>,
}

impl BenchmarkResolver {
    pub fn new(source: Arc<dyn BenchmarkSource>, required_metrics: Vec<String>) -> Self {
        Self::with_timeout(source, required_metrics, DEFAULT_LOOKUP_TIMEOUT)
    }

    pub fn with_timeout(
        source: Arc<dyn BenchmarkSource>,
        required_metrics: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            state: Arc::new(ResolverState {
                source,
                required_metrics,
                timeout,
                slots: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn required_metrics(&self) -> &[String] {
        &self.state.required_metrics
    }

    pub fn timeout(&self) -> Duration {
        self.state.timeout
    }

    /// Benchmark figures for a cohort. Never fails; absent data is the all-zero default record.
    pub async fn get_benchmarks(&self, sector: &str, size_bucket: &str) -> BenchmarkRecord {
        self.resolve(sector, size_bucket).await.record
    }

    pub async fn resolve(&self, sector: &str, size_bucket: &str) -> BenchmarkResolution {
        let cohort = Cohort::new(sector, size_bucket);

        let (lookup, shared) = {
            let mut slots = self
                .state
                .slots
                .lock()
                .expect("benchmark slots mutex poisoned");
            match slots.get(&cohort.key) {
                Some(Slot::Ready { record, defaulted }) => {
                    debug!(cohort = %cohort.key, defaulted, "benchmark cache hit");
                    return BenchmarkResolution {
                        record: record.clone(),
                        origin: BenchmarkOrigin::Cache {
                            defaulted: *defaulted,
                        },
                        shared: false,
                    };
                }
                Some(Slot::Pending(lookup)) => {
                    debug!(cohort = %cohort.key, "joining in-flight benchmark lookup");
                    (lookup.clone(), true)
                }
                None => {
                    let key = cohort.key.clone();
                    let lookup = self.start_lookup(cohort);
                    slots.insert(key, Slot::Pending(lookup.clone()));
                    (lookup, false)
                }
            }
        };

        let mut resolution = lookup.await;
        resolution.shared = shared;
        resolution
    }

    /// Resolves a possibly incomplete cohort. Without both parts no lookup is made and the
    /// uncached default record is returned.
    pub async fn resolve_cohort(
        &self,
        sector: Option<&str>,
        size_bucket: Option<&str>,
    ) -> BenchmarkResolution {
        match (sector, size_bucket) {
            (Some(sector), Some(size_bucket)) => self.resolve(sector, size_bucket).await,
            (sector, size_bucket) => {
                debug!(?sector, ?size_bucket, "cohort incomplete; skipping benchmark lookup");
                BenchmarkResolution {
                    record: BenchmarkRecord::defaults(
                        sector.unwrap_or_default(),
                        size_bucket.unwrap_or_default(),
                        self.required_metrics(),
                    ),
                    origin: BenchmarkOrigin::Fallback {
                        reason: LookupFailure::MissingCohort,
                    },
                    shared: false,
                }
            }
        }
    }

    /// Cached record for a cohort, if a lookup has already settled.
    pub fn cached(&self, sector: &str, size_bucket: &str) -> Option<BenchmarkRecord> {
        let slots = self
            .state
            .slots
            .lock()
            .expect("benchmark slots mutex poisoned");
        match slots.get(&cohort_key(sector, size_bucket)) {
            Some(Slot::Ready { record, .. }) => Some(record.clone()),
            _ => None,
        }
    }

    fn start_lookup(&self, cohort: Cohort) -> PendingLookup {
        let task_state = Arc::clone(&self.state);
        let task_cohort = cohort.clone();
        let handle = tokio::spawn(async move { task_state.lookup(task_cohort).await });

        let state = Arc::clone(&self.state);
        async move {
            match handle.await {
                Ok(resolution) => resolution,
                Err(err) => {
                    warn!(cohort = %cohort.key, error = %err, "benchmark lookup task failed; using defaults");
                    state.settle_fallback(&cohort, LookupFailure::Aborted)
                }
            }
        }
        .boxed()
        .shared()
    }
}

#[derive(Debug, Clone)]
struct Cohort {
    key: String,
    sector: String,
    size_bucket: String,
}

impl Cohort {
    fn new(sector: &str, size_bucket: &str) -> Self {
        Self {
            key: cohort_key(sector, size_bucket),
            sector: sector.to_string(),
            size_bucket: size_bucket.to_string(),
        }
    }
}

impl ResolverState {
    async fn lookup(&self, cohort: Cohort) -> BenchmarkResolution {
        let fetched = tokio::time::timeout(
            self.timeout,
            self.source
                .fetch_averages(&cohort.sector, &cohort.size_bucket),
        )
        .await;

        let outcome = match fetched {
            Err(_) => Err(LookupFailure::Timeout {
                seconds: self.timeout.as_secs(),
            }),
            Ok(Err(err)) => Err(LookupFailure::Transport {
                message: err.to_string(),
            }),
            Ok(Ok(raw)) => BenchmarkRecord::from_raw(
                &cohort.sector,
                &cohort.size_bucket,
                &raw,
                &self.required_metrics,
            )
            .map_err(|missing| LookupFailure::Incomplete { missing }),
        };

        match outcome {
            Ok(record) => {
                info!(cohort = %cohort.key, "benchmark averages loaded");
                self.store(&cohort.key, record.clone(), false);
                BenchmarkResolution {
                    record,
                    origin: BenchmarkOrigin::Remote,
                    shared: false,
                }
            }
            Err(reason) => {
                warn!(cohort = %cohort.key, %reason, "benchmark lookup failed; using defaults");
                self.settle_fallback(&cohort, reason)
            }
        }
    }

    fn settle_fallback(&self, cohort: &Cohort, reason: LookupFailure) -> BenchmarkResolution {
        let record =
            BenchmarkRecord::defaults(&cohort.sector, &cohort.size_bucket, &self.required_metrics);
        self.store(&cohort.key, record.clone(), true);
        BenchmarkResolution {
            record,
            origin: BenchmarkOrigin::Fallback { reason },
            shared: false,
        }
    }

    fn store(&self, key: &str, record: BenchmarkRecord, defaulted: bool) {
        self.slots
            .lock()
            .expect("benchmark slots mutex poisoned")
            .insert(key.to_string(), Slot::Ready { record, defaulted });
    }
}
