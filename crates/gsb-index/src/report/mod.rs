//! Sector comparison and the display-ready score report.

mod comparison;
mod rounding;
mod views;

pub use comparison::{compare_to_sector, MetricComparison};
pub use rounding::{format_delta, round_half_away_from_zero, round_to_tenth, DeltaDirection};
pub use views::{PillarSection, ReportEntry, ScoreReport};
