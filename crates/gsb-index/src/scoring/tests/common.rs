use crate::scoring::{AnswerMap, SchemaVersion, ScoreCalculator};

pub(super) fn calculator(version: SchemaVersion) -> ScoreCalculator {
    ScoreCalculator::new(version.schema()).expect("bundled schema validates")
}

pub(super) fn answers(fields: &[(&str, &str)]) -> AnswerMap {
    fields.iter().copied().collect()
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// The worked example from the product brief: two single-choice answers and two ticked boxes.
pub(super) fn strategy_answers() -> AnswerMap {
    answers(&[
        ("P1", "q1-80"),
        ("P2", "q2-60"),
        ("p3.1-12.5", "on"),
        ("p3.4-12.5", "on"),
    ])
}
