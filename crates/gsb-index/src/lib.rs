pub mod assessment;
pub mod benchmarks;
pub mod config;
pub mod error;
pub mod report;
pub mod scoring;
pub mod telemetry;
