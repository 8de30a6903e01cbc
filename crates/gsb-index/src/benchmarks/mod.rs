//! Sectorial benchmark lookup: sources, records, and the caching resolver.

mod csv_source;
mod http_source;
mod record;
mod resolver;
mod source;

#[cfg(test)]
mod tests;

pub use csv_source::{CsvBenchmarkSource, CsvTableError};
pub use http_source::{parse_averages, HttpBenchmarkSource};
pub use record::{cohort_key, BenchmarkRecord};
pub use resolver::{
    BenchmarkOrigin, BenchmarkResolution, BenchmarkResolver, LookupFailure,
    DEFAULT_LOOKUP_TIMEOUT,
};
pub use source::{BenchmarkSource, RawAverages, SourceError, UnconfiguredSource};
