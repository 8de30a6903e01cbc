//! Questionnaire scoring: answer extraction, declarative schemas, and the calculator.

pub mod answers;
mod calculator;
pub mod schema;
mod variants;

#[cfg(test)]
mod tests;

pub use answers::{
    extract_checkbox_weight, extract_numeric, numeric_suffix, AnswerMap, CheckboxSelection,
    QuestionId, RespondentProfile,
};
pub use calculator::{
    compute_scores, promote_single_checkbox_to_full, PillarScore, ScoreCalculator, ScoreResult,
    SubThemeScore, PROMOTION_TOLERANCE, SINGLE_CHECKBOX_SCORE,
};
pub use schema::{
    CheckboxGroup, CheckboxOption, Component, PillarKind, PillarSpec, SchemaError, SchemaVersion,
    ScoringSchema, SubThemeSpec, UnknownSchemaVersion, COMPOSITE_METRIC,
};
