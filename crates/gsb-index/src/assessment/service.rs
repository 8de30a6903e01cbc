use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{AssessmentOutcome, AssessmentRequest, SubmissionStatus};
use super::submission::{ScoreSubmission, SubmissionSink};
use crate::benchmarks::BenchmarkResolver;
use crate::report::ScoreReport;
use crate::scoring::{
    RespondentProfile, SchemaError, SchemaVersion, ScoreCalculator, ScoringSchema,
    UnknownSchemaVersion,
};

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    UnknownSchemaVersion(#[from] UnknownSchemaVersion),
}

/// Bundled schema as listed by the service.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaSummary<'a> {
    pub version: SchemaVersion,
    pub default: bool,
    pub metrics: Vec<String>,
    pub schema: &'a ScoringSchema,
}

/// Service composing the calculator registry, the benchmark resolver, and the submission sink.
pub struct AssessmentService<S> {
    calculators: HashMap<SchemaVersion, ScoreCalculator>,
    default_version: SchemaVersion,
    resolver: BenchmarkResolver,
    sink: Arc<S>,
}

impl<S> AssessmentService<S>
where
    S: SubmissionSink + 'static,
{
    pub fn new(
        resolver: BenchmarkResolver,
        sink: Arc<S>,
        default_version: SchemaVersion,
    ) -> Result<Self, SchemaError> {
        let calculators = SchemaVersion::ALL
            .into_iter()
            .map(|version| ScoreCalculator::new(version.schema()).map(|calc| (version, calc)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self {
            calculators,
            default_version,
            resolver,
            sink,
        })
    }

    pub fn default_version(&self) -> SchemaVersion {
        self.default_version
    }

    pub fn resolver(&self) -> &BenchmarkResolver {
        &self.resolver
    }

    pub fn schemas(&self) -> Vec<SchemaSummary<'_>> {
        SchemaVersion::ALL
            .into_iter()
            .filter_map(|version| {
                self.calculators.get(&version).map(|calc| SchemaSummary {
                    version,
                    default: version == self.default_version,
                    metrics: calc.schema().metric_names(),
                    schema: calc.schema(),
                })
            })
            .collect()
    }

    /// Scores one response, compares it with its sector cohort, and forwards the result.
    ///
    /// Benchmark and submission problems never fail the assessment; only an unknown schema
    /// version does.
    pub async fn assess(
        &self,
        request: AssessmentRequest,
    ) -> Result<AssessmentOutcome, AssessmentError> {
        let version = match request.schema_version.as_deref() {
            Some(value) => value.parse::<SchemaVersion>()?,
            None => self.default_version,
        };
        let calculator = self.calculator(version)?;

        let mut profile = RespondentProfile::from_answers(&request.answers);
        profile.override_cohort(request.sector, request.size_bucket);

        let scores = calculator.compute_scores(&request.answers);
        let resolution = self
            .resolver
            .resolve_cohort(profile.sector.as_deref(), profile.size_bucket.as_deref())
            .await;
        let report = ScoreReport::assemble(&scores, &resolution);

        let submission = if profile.has_form_data() {
            let payload =
                ScoreSubmission::new(version.as_str(), profile.clone(), &scores, Utc::now());
            self.forward(&payload).await
        } else {
            debug!("response carries no company details; submission skipped");
            SubmissionStatus::Skipped
        };

        Ok(AssessmentOutcome {
            schema_version: version.to_string(),
            profile,
            scores,
            report,
            submission,
        })
    }

    fn calculator(&self, version: SchemaVersion) -> Result<&ScoreCalculator, AssessmentError> {
        self.calculators
            .get(&version)
            .ok_or_else(|| UnknownSchemaVersion(version.to_string()).into())
    }

    async fn forward(&self, payload: &ScoreSubmission) -> SubmissionStatus {
        match self.sink.submit(payload).await {
            Ok(()) => {
                info!(
                    company = payload.profile.company.as_deref().unwrap_or_default(),
                    schema_version = %payload.schema_version,
                    "assessment submitted"
                );
                SubmissionStatus::Sent
            }
            Err(err) => {
                warn!(error = %err, "assessment submission failed");
                SubmissionStatus::Failed
            }
        }
    }
}
