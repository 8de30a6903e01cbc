use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rounding::{format_delta, round_to_tenth, DeltaDirection};
use crate::benchmarks::BenchmarkRecord;
use crate::scoring::ScoreResult;

/// One metric next to its sector figure. `delta = value - sector_value`, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub value: f64,
    pub sector_value: f64,
    pub delta: f64,
}

impl MetricComparison {
    pub fn new(value: f64, sector_value: f64) -> Self {
        Self {
            value,
            sector_value,
            delta: value - sector_value,
        }
    }

    pub fn rounded_delta(&self) -> f64 {
        round_to_tenth(self.delta)
    }

    pub fn delta_label(&self) -> String {
        format_delta(self.delta)
    }

    pub fn direction(&self) -> DeltaDirection {
        DeltaDirection::of(self.delta)
    }
}

/// Pairs every computed metric with the benchmark figure of the same name.
///
/// A metric the record lacks compares against 0, the same sentinel the default record uses.
pub fn compare_to_sector(
    score: &ScoreResult,
    benchmark: &BenchmarkRecord,
) -> BTreeMap<String, MetricComparison> {
    score
        .metrics()
        .into_iter()
        .map(|(metric, value)| {
            let sector_value = benchmark.value(&metric);
            (metric, MetricComparison::new(value, sector_value))
        })
        .collect()
}
