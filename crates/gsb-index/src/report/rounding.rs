use serde::{Deserialize, Serialize};

/// Values are snapped to this grid before rounding so binary artefacts round as their decimal.
const SNAP_SCALE: f64 = 1e6;

fn snap(value: f64) -> f64 {
    (value * SNAP_SCALE).round() / SNAP_SCALE
}

/// Round half away from zero to an integer. Negative zero comes back as zero.
pub fn round_half_away_from_zero(value: f64) -> f64 {
    snap(value).round() + 0.0
}

/// Round to one decimal place: `55.0 - 52.95` gives `2.1`.
pub fn round_to_tenth(value: f64) -> f64 {
    round_half_away_from_zero(value * 10.0) / 10.0 + 0.0
}

/// Display label for a delta: `+2.1%`, `-3.4%`, `+2%`.
///
/// The sign comes from the rounded delta, so `-0.04` is shown as `+0%`.
pub fn format_delta(delta: f64) -> String {
    let rounded = round_to_tenth(delta);
    let sign = if rounded >= 0.0 { "+" } else { "" };
    format!("{sign}{rounded}%")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaDirection {
    AtOrAbove,
    Below,
}

impl DeltaDirection {
    pub fn of(delta: f64) -> Self {
        if round_to_tenth(delta) >= 0.0 {
            Self::AtOrAbove
        } else {
            Self::Below
        }
    }
}
