use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::answers::{extract_checkbox_weight, extract_numeric, AnswerMap};
use super::schema::{
    CheckboxGroup, CheckboxOption, Component, PillarKind, SchemaError, ScoringSchema,
    COMPOSITE_METRIC,
};

/// Score of one ticked option out of seven; the single-selection edge case.
pub const SINGLE_CHECKBOX_SCORE: f64 = 14.29;

/// Values strictly closer than this to [`SINGLE_CHECKBOX_SCORE`] are promoted.
pub const PROMOTION_TOLERANCE: f64 = 0.01;

/// Treats a lone ticked box out of seven (≈14.29) as a full score of 100.
///
/// Only applied to components the schema flags with `promote_single_checkbox`.
pub fn promote_single_checkbox_to_full(value: f64) -> f64 {
    // The 1e-9 margin keeps 14.28 and 14.30 outside the window despite binary rounding.
    if (value - SINGLE_CHECKBOX_SCORE).abs() < PROMOTION_TOLERANCE - 1e-9 {
        100.0
    } else {
        value
    }
}

/// Stateless evaluator bound to a validated scoring schema.
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    schema: ScoringSchema,
}

impl ScoreCalculator {
    pub fn new(schema: ScoringSchema) -> Result<Self, SchemaError> {
        schema.validate()?;
        Ok(Self { schema })
    }

    pub fn schema(&self) -> &ScoringSchema {
        &self.schema
    }

    pub fn compute_scores(&self, answers: &AnswerMap) -> ScoreResult {
        let mut sub_themes = Vec::new();
        let mut pillars = Vec::with_capacity(self.schema.pillars.len());

        for pillar in &self.schema.pillars {
            let theme_values: Vec<f64> = pillar
                .sub_themes
                .iter()
                .map(|theme| {
                    let values: Vec<f64> = theme
                        .components
                        .iter()
                        .map(|component| component_value(component, answers))
                        .collect();
                    let value = mean(&values);
                    sub_themes.push(SubThemeScore {
                        pillar: pillar.kind,
                        key: theme.key.clone(),
                        label: theme.label.clone(),
                        value,
                    });
                    value
                })
                .collect();

            pillars.push(PillarScore {
                kind: pillar.kind,
                value: mean(&theme_values),
            });
        }

        let pillar_values: Vec<f64> = pillars.iter().map(|pillar| pillar.value).collect();

        ScoreResult {
            schema_id: self.schema.id.clone(),
            sub_themes,
            pillars,
            composite: mean(&pillar_values),
        }
    }
}

/// Validates `schema` and scores `answers` against it.
pub fn compute_scores(
    answers: &AnswerMap,
    schema: &ScoringSchema,
) -> Result<ScoreResult, SchemaError> {
    Ok(ScoreCalculator::new(schema.clone())?.compute_scores(answers))
}

fn component_value(component: &Component, answers: &AnswerMap) -> f64 {
    match component {
        Component::Question {
            id,
            promote_single_checkbox,
        } => {
            let value = extract_numeric(answers, id);
            if *promote_single_checkbox {
                promote_single_checkbox_to_full(value)
            } else {
                value
            }
        }
        Component::Mean { questions, .. } => {
            let values: Vec<f64> = questions
                .iter()
                .map(|question| extract_numeric(answers, question))
                .collect();
            mean(&values)
        }
        Component::Checkbox(group) => {
            let total = checkbox_total(group, answers);
            if group.promote_single_checkbox {
                promote_single_checkbox_to_full(total)
            } else {
                total
            }
        }
    }
}

fn checkbox_total(group: &CheckboxGroup, answers: &AnswerMap) -> f64 {
    group
        .options
        .iter()
        .map(|option| option_score(option, group, answers))
        .sum()
}

fn option_score(option: &CheckboxOption, group: &CheckboxGroup, answers: &AnswerMap) -> f64 {
    match option.weight {
        Some(weight) if group.selection.is_selected(answers.get(&option.key)) => weight,
        Some(_) => 0.0,
        None => extract_checkbox_weight(answers, &option.key, group.selection),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubThemeScore {
    pub pillar: PillarKind,
    pub key: String,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarScore {
    pub kind: PillarKind,
    pub value: f64,
}

/// Unrounded scores for one answer set, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub schema_id: String,
    pub sub_themes: Vec<SubThemeScore>,
    pub pillars: Vec<PillarScore>,
    pub composite: f64,
}

impl ScoreResult {
    pub fn pillar(&self, kind: PillarKind) -> f64 {
        self.pillars
            .iter()
            .find(|pillar| pillar.kind == kind)
            .map(|pillar| pillar.value)
            .unwrap_or(0.0)
    }

    pub fn sub_theme(&self, key: &str) -> Option<f64> {
        self.sub_themes
            .iter()
            .find(|theme| theme.key == key)
            .map(|theme| theme.value)
    }

    /// Looks a value up by its benchmark metric name.
    pub fn metric(&self, name: &str) -> Option<f64> {
        if name == COMPOSITE_METRIC {
            return Some(self.composite);
        }
        if let Some(pillar) = self
            .pillars
            .iter()
            .find(|pillar| pillar.kind.metric_name() == name)
        {
            return Some(pillar.value);
        }
        self.sub_theme(name)
    }

    pub fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics: BTreeMap<String, f64> = self
            .sub_themes
            .iter()
            .map(|theme| (theme.key.clone(), theme.value))
            .collect();
        for pillar in &self.pillars {
            metrics.insert(pillar.kind.metric_name().to_string(), pillar.value);
        }
        metrics.insert(COMPOSITE_METRIC.to_string(), self.composite);
        metrics
    }

    pub fn sub_themes_of(&self, kind: PillarKind) -> impl Iterator<Item = &SubThemeScore> {
        self.sub_themes
            .iter()
            .filter(move |theme| theme.pillar == kind)
    }
}
