use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::answers::{numeric_suffix, CheckboxSelection, QuestionId};

/// Metric name of the global index, shared with the benchmark source.
pub const COMPOSITE_METRIC: &str = "gsb_index_total";

/// A fully ticked checkbox group must add up to this many points.
pub const CHECKBOX_GROUP_TOTAL: f64 = 100.0;

/// Allowed drift of a checkbox group total, absorbing per-option rounding such as 7 x 14.29.
pub const CHECKBOX_TOTAL_TOLERANCE: f64 = 0.1;

/// Top-level sustainability axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarKind {
    Environmental,
    Social,
    Governance,
}

impl PillarKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Environmental, Self::Social, Self::Governance]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Environmental => "Ambiental",
            Self::Social => "Social",
            Self::Governance => "Gobernanza",
        }
    }

    /// Metric name used for this pillar in benchmark tables.
    pub const fn metric_name(self) -> &'static str {
        match self {
            Self::Environmental => "media_ambiental",
            Self::Social => "media_social",
            Self::Governance => "media_gobernanza",
        }
    }
}

/// Identifier of a bundled questionnaire revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// Per-pillar result charts: 5-question climate impact, four-part P21.
    #[serde(rename = "charts-v1")]
    ChartsV1,
    /// Results-sheet upload: 6-question climate impact, two-part P21.
    #[default]
    #[serde(rename = "sheets-v2")]
    SheetsV2,
    /// Sheets membership with `on`-valued checkboxes and single-checkbox promotion on P17.
    #[serde(rename = "sheets-v3")]
    SheetsV3,
}

impl SchemaVersion {
    pub const ALL: [Self; 3] = [Self::ChartsV1, Self::SheetsV2, Self::SheetsV3];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChartsV1 => "charts-v1",
            Self::SheetsV2 => "sheets-v2",
            Self::SheetsV3 => "sheets-v3",
        }
    }

    pub fn schema(self) -> ScoringSchema {
        super::variants::bundled(self)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = UnknownSchemaVersion;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|version| version.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownSchemaVersion(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown schema version '{0}'")]
pub struct UnknownSchemaVersion(pub String);

/// Declarative scoring table: which answers feed which sub-theme, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSchema {
    pub id: String,
    pub pillars: Vec<PillarSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarSpec {
    pub kind: PillarKind,
    pub sub_themes: Vec<SubThemeSpec>,
}

/// Named category whose score is the mean of its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubThemeSpec {
    pub key: String,
    pub label: String,
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    /// One single-choice answer already scaled to 0-100.
    Question {
        id: QuestionId,
        #[serde(default)]
        promote_single_checkbox: bool,
    },
    /// Mean of a battery of sub-questions, e.g. P9 over P9.1..P9.8.
    Mean { id: String, questions: Vec<QuestionId> },
    /// Sum of the weights of the ticked options.
    Checkbox(CheckboxGroup),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckboxGroup {
    pub id: String,
    #[serde(default)]
    pub selection: CheckboxSelection,
    pub options: Vec<CheckboxOption>,
    #[serde(default)]
    pub promote_single_checkbox: bool,
}

impl CheckboxGroup {
    /// Score when every option is ticked.
    pub fn full_total(&self) -> f64 {
        self.options.iter().map(CheckboxOption::weight).sum()
    }
}

/// A checkbox answer key such as `p23.2-16.66666667`.
///
/// Without an explicit weight the option is worth the number encoded in its key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckboxOption {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl CheckboxOption {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn weight(&self) -> f64 {
        self.weight
            .or_else(|| numeric_suffix(&self.key))
            .unwrap_or(0.0)
    }
}

/// Configuration bugs detected while building a calculator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("schema declares no pillar '{0:?}'")]
    MissingPillar(PillarKind),
    #[error("schema declares pillar '{0:?}' more than once")]
    DuplicatePillar(PillarKind),
    #[error("pillar '{pillar:?}' must aggregate 2 to 4 sub-themes, found {count}")]
    SubThemeCount { pillar: PillarKind, count: usize },
    #[error("sub-theme '{0}' has no questions")]
    EmptySubTheme(String),
    #[error("question group '{group}' in sub-theme '{sub_theme}' has no questions")]
    EmptyQuestionGroup { sub_theme: String, group: String },
    #[error("checkbox group '{group}' in sub-theme '{sub_theme}' has no options")]
    EmptyCheckboxGroup { sub_theme: String, group: String },
    #[error("checkbox group '{group}' totals {total:.4} when fully ticked, expected 100 ± 0.1")]
    CheckboxWeights { group: String, total: f64 },
    #[error("metric name '{0}' is declared more than once")]
    DuplicateMetric(String),
}

impl ScoringSchema {
    pub fn pillar(&self, kind: PillarKind) -> Option<&PillarSpec> {
        self.pillars.iter().find(|pillar| pillar.kind == kind)
    }

    /// Every metric a benchmark record must carry: sub-themes, pillars, then the composite.
    pub fn metric_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .pillars
            .iter()
            .flat_map(|pillar| pillar.sub_themes.iter().map(|theme| theme.key.clone()))
            .collect();
        names.extend(
            PillarKind::ordered()
                .into_iter()
                .map(|kind| kind.metric_name().to_string()),
        );
        names.push(COMPOSITE_METRIC.to_string());
        names
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen_pillars = BTreeSet::new();
        for pillar in &self.pillars {
            if !seen_pillars.insert(pillar.kind) {
                return Err(SchemaError::DuplicatePillar(pillar.kind));
            }
        }
        if let Some(missing) = PillarKind::ordered()
            .into_iter()
            .find(|kind| !seen_pillars.contains(kind))
        {
            return Err(SchemaError::MissingPillar(missing));
        }

        let mut metric_names: BTreeSet<String> = PillarKind::ordered()
            .into_iter()
            .map(|kind| kind.metric_name().to_string())
            .collect();
        metric_names.insert(COMPOSITE_METRIC.to_string());

        for pillar in &self.pillars {
            let count = pillar.sub_themes.len();
            if !(2..=4).contains(&count) {
                return Err(SchemaError::SubThemeCount {
                    pillar: pillar.kind,
                    count,
                });
            }

            for theme in &pillar.sub_themes {
                if !metric_names.insert(theme.key.clone()) {
                    return Err(SchemaError::DuplicateMetric(theme.key.clone()));
                }
                validate_sub_theme(theme)?;
            }
        }

        Ok(())
    }
}

fn validate_sub_theme(theme: &SubThemeSpec) -> Result<(), SchemaError> {
    if theme.components.is_empty() {
        return Err(SchemaError::EmptySubTheme(theme.key.clone()));
    }

    for component in &theme.components {
        match component {
            Component::Question { .. } => {}
            Component::Mean { id, questions } => {
                if questions.is_empty() {
                    return Err(SchemaError::EmptyQuestionGroup {
                        sub_theme: theme.key.clone(),
                        group: id.clone(),
                    });
                }
            }
            Component::Checkbox(group) => {
                if group.options.is_empty() {
                    return Err(SchemaError::EmptyCheckboxGroup {
                        sub_theme: theme.key.clone(),
                        group: group.id.clone(),
                    });
                }
                let total = group.full_total();
                // 1e-9 keeps exact-boundary totals such as 100.1 from failing on float noise.
                if (total - CHECKBOX_GROUP_TOTAL).abs() > CHECKBOX_TOTAL_TOLERANCE + 1e-9 {
                    return Err(SchemaError::CheckboxWeights {
                        group: group.id.clone(),
                        total,
                    });
                }
            }
        }
    }

    Ok(())
}
