use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix the survey form uses for single-choice question fields (`Pregunta-21.3`).
const FORM_QUESTION_PREFIX: &str = "Pregunta-";

/// Sub-question identifier such as `P21` or `P21.3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Read-only view over one survey response: question ids and checkbox option keys to raw strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap {
    fields: BTreeMap<String, String>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from raw form fields, renaming `Pregunta-<n>` to `P<n>` and dropping blanks.
    pub fn from_form_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (key, value) in fields {
            let value = value.into();
            if value.is_empty() {
                continue;
            }
            let key = key.as_ref();
            let key = match key.strip_prefix(FORM_QUESTION_PREFIX) {
                Some(suffix) => format!("P{suffix}"),
                None => key.to_string(),
            };
            map.fields.insert(key, value);
        }
        map
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// How a form version encodes a ticked checkbox.
///
/// Both dialects exist for identical-looking option keys and the survey owners have not said
/// which one is authoritative, so each checkbox group declares its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckboxSelection {
    /// Any non-empty value under the option key counts as selected.
    #[default]
    KeyPresent,
    /// Only the literal value `on` counts as selected.
    ValueOn,
}

impl CheckboxSelection {
    pub fn is_selected(self, value: Option<&str>) -> bool {
        match (self, value) {
            (_, None) => false,
            (Self::KeyPresent, Some(value)) => !value.is_empty(),
            (Self::ValueOn, Some(value)) => value == "on",
        }
    }
}

/// Parses the text after the last `-` as a float. Unparseable or non-finite suffixes are `None`.
pub fn numeric_suffix(raw: &str) -> Option<f64> {
    let suffix = raw.rsplit('-').next().unwrap_or(raw).trim();
    if suffix.is_empty() {
        return None;
    }
    suffix.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Numeric value of a single-choice answer; missing or malformed answers contribute 0.
pub fn extract_numeric(answers: &AnswerMap, question: &QuestionId) -> f64 {
    answers
        .get(question.as_str())
        .and_then(numeric_suffix)
        .unwrap_or(0.0)
}

/// Weight encoded in `option_key` (`p23.2-16.66666667` -> 16.66666667) when that option is ticked.
pub fn extract_checkbox_weight(
    answers: &AnswerMap,
    option_key: &str,
    selection: CheckboxSelection,
) -> f64 {
    if selection.is_selected(answers.get(option_key)) {
        numeric_suffix(option_key).unwrap_or(0.0)
    } else {
        0.0
    }
}

/// Company details submitted next to the questionnaire answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bucket: Option<String>,
}

impl RespondentProfile {
    pub fn from_answers(answers: &AnswerMap) -> Self {
        Self {
            email: first_present(answers, &["Email", "email"]),
            company: first_present(answers, &["Compañia", "Compania"]),
            contact_name: first_present(answers, &["Nombre", "Persona de contacto"]),
            sector: first_present(answers, &["Sector"]),
            size_bucket: first_present(
                answers,
                &[
                    "Tamaño-de-tu-empresa",
                    "Tama-o-de-tu-empresa",
                    "Tamaño de tu empresa",
                ],
            ),
        }
    }

    /// True when the response carries at least an email and a company name.
    pub fn has_form_data(&self) -> bool {
        self.email.is_some() && self.company.is_some()
    }

    /// Replaces the answered cohort with explicit values. Blank overrides are ignored.
    pub fn override_cohort(&mut self, sector: Option<String>, size_bucket: Option<String>) {
        if let Some(sector) = non_blank(sector) {
            self.sector = Some(sector);
        }
        if let Some(size_bucket) = non_blank(size_bucket) {
            self.size_bucket = Some(size_bucket);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn first_present(answers: &AnswerMap, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| answers.get(key))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
