use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::source::RawAverages;

/// Sectorial reference figures for one (sector, size bucket) cohort, keyed by metric name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub sector: String,
    pub size_bucket: String,
    pub values: BTreeMap<String, f64>,
}

impl BenchmarkRecord {
    /// All-zero record meaning "no data". Zero is a sentinel, not a real average.
    pub fn defaults(sector: &str, size_bucket: &str, metric_names: &[String]) -> Self {
        Self {
            sector: sector.to_string(),
            size_bucket: size_bucket.to_string(),
            values: metric_names
                .iter()
                .map(|name| (name.clone(), 0.0))
                .collect(),
        }
    }

    /// Accepts `raw` only if it carries every required metric; otherwise returns the missing names.
    pub fn from_raw(
        sector: &str,
        size_bucket: &str,
        raw: &RawAverages,
        required: &[String],
    ) -> Result<Self, Vec<String>> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| raw.get(name).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(Self {
            sector: sector.to_string(),
            size_bucket: size_bucket.to_string(),
            values: required
                .iter()
                .filter_map(|name| raw.get(name).map(|value| (name.clone(), value)))
                .collect(),
        })
    }

    pub fn value(&self, metric: &str) -> f64 {
        self.values.get(metric).copied().unwrap_or(0.0)
    }
}

/// Cache key for a cohort. Plain `_` join, case-sensitive, no normalization.
pub fn cohort_key(sector: &str, size_bucket: &str) -> String {
    format!("{sector}_{size_bucket}")
}
