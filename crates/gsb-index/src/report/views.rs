use serde::Serialize;

use super::comparison::MetricComparison;
use super::rounding::{round_half_away_from_zero, round_to_tenth, DeltaDirection};
use crate::benchmarks::{BenchmarkOrigin, BenchmarkResolution};
use crate::scoring::{ScoreResult, COMPOSITE_METRIC};

const COMPOSITE_LABEL: &str = "GSB Index";

/// Display-ready line for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub metric: String,
    pub label: String,
    pub score: f64,
    pub rounded_score: f64,
    pub sector_value: f64,
    pub rounded_sector_value: f64,
    pub delta: f64,
    pub rounded_delta: f64,
    pub delta_label: String,
    pub direction: DeltaDirection,
}

impl ReportEntry {
    fn new(metric: &str, label: &str, comparison: MetricComparison) -> Self {
        Self {
            metric: metric.to_string(),
            label: label.to_string(),
            score: comparison.value,
            rounded_score: round_half_away_from_zero(comparison.value),
            sector_value: comparison.sector_value,
            rounded_sector_value: round_to_tenth(comparison.sector_value),
            delta: comparison.delta,
            rounded_delta: comparison.rounded_delta(),
            delta_label: comparison.delta_label(),
            direction: comparison.direction(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarSection {
    #[serde(flatten)]
    pub summary: ReportEntry,
    pub sub_themes: Vec<ReportEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub schema_id: String,
    pub sector: String,
    pub size_bucket: String,
    /// False when the comparison figures are the all-zero default record.
    pub benchmark_available: bool,
    pub benchmark_origin: BenchmarkOrigin,
    pub composite: ReportEntry,
    pub pillars: Vec<PillarSection>,
}

impl ScoreReport {
    /// Lays scores and sector figures out in schema order: composite, then each pillar with
    /// its sub-themes.
    pub fn assemble(scores: &ScoreResult, resolution: &BenchmarkResolution) -> Self {
        let record = &resolution.record;
        let entry = |metric: &str, label: &str, value: f64| {
            ReportEntry::new(
                metric,
                label,
                MetricComparison::new(value, record.value(metric)),
            )
        };

        let pillars = scores
            .pillars
            .iter()
            .map(|pillar| PillarSection {
                summary: entry(pillar.kind.metric_name(), pillar.kind.label(), pillar.value),
                sub_themes: scores
                    .sub_themes_of(pillar.kind)
                    .map(|theme| entry(&theme.key, &theme.label, theme.value))
                    .collect(),
            })
            .collect();

        Self {
            schema_id: scores.schema_id.clone(),
            sector: record.sector.clone(),
            size_bucket: record.size_bucket.clone(),
            benchmark_available: !resolution.is_default_record(),
            benchmark_origin: resolution.origin.clone(),
            composite: entry(COMPOSITE_METRIC, COMPOSITE_LABEL, scores.composite),
            pillars,
        }
    }

    pub fn entry(&self, metric: &str) -> Option<&ReportEntry> {
        if self.composite.metric == metric {
            return Some(&self.composite);
        }
        self.pillars.iter().find_map(|section| {
            if section.summary.metric == metric {
                Some(&section.summary)
            } else {
                section.sub_themes.iter().find(|entry| entry.metric == metric)
            }
        })
    }
}
