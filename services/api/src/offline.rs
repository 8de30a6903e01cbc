use crate::infra::build_resolver;
use clap::Args;
use gsb_index::benchmarks::BenchmarkResolver;
use gsb_index::config::AppConfig;
use gsb_index::error::AppError;
use gsb_index::report::ScoreReport;
use gsb_index::scoring::{
    AnswerMap, RespondentProfile, SchemaVersion, ScoreCalculator, ScoreResult, ScoringSchema,
};
use gsb_index::telemetry::{self, LogSink};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON object of form fields (question ids and checkbox option keys to raw values)
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Bundled schema to score against (defaults to GSB_SCHEMA_VERSION)
    #[arg(long, conflicts_with = "schema")]
    pub(crate) schema_version: Option<SchemaVersion>,
    /// Custom schema JSON file, validated before scoring
    #[arg(long)]
    pub(crate) schema: Option<PathBuf>,
    /// Benchmark sector (defaults to the `Sector` answer)
    #[arg(long)]
    pub(crate) sector: Option<String>,
    /// Benchmark size bucket (defaults to the `Tamaño-de-tu-empresa` answer)
    #[arg(long)]
    pub(crate) size_bucket: Option<String>,
    /// CSV benchmark table used instead of the configured source
    #[arg(long)]
    pub(crate) benchmarks_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct SchemaArgs {
    /// Bundled schema to print
    #[arg(long, conflicts_with = "file")]
    pub(crate) version: Option<SchemaVersion>,
    /// Schema JSON file to validate and print
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ScoreOutput {
    profile: RespondentProfile,
    scores: ScoreResult,
    report: ScoreReport,
}

#[derive(Debug, Serialize)]
struct SchemaOutput {
    metrics: Vec<String>,
    schema: ScoringSchema,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;

    let answers = load_answers(&args.answers)?;
    let schema = match &args.schema {
        Some(path) => load_schema(path)?,
        None => args
            .schema_version
            .unwrap_or(config.scoring.default_version)
            .schema(),
    };
    let required_metrics = schema.metric_names();
    let calculator = ScoreCalculator::new(schema)?;
    let resolver = build_resolver(&config, required_metrics, args.benchmarks_csv.as_deref())?;

    let output = score(
        &calculator,
        &resolver,
        answers,
        args.sector,
        args.size_bucket,
    )
    .await;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) fn run_schema(args: SchemaArgs) -> Result<(), AppError> {
    let schema = match (&args.file, args.version) {
        (Some(path), _) => load_schema(path)?,
        (None, Some(version)) => version.schema(),
        (None, None) => SchemaVersion::default().schema(),
    };
    schema.validate()?;

    let output = SchemaOutput {
        metrics: schema.metric_names(),
        schema,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Reads a form-field JSON object. `Pregunta-<n>` keys are renamed to `P<n>`; blanks are dropped.
fn load_answers(path: &Path) -> Result<AnswerMap, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let fields: BTreeMap<String, String> = serde_json::from_str(&raw)?;
    Ok(AnswerMap::from_form_fields(fields))
}

fn load_schema(path: &Path) -> Result<ScoringSchema, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

async fn score(
    calculator: &ScoreCalculator,
    resolver: &BenchmarkResolver,
    answers: AnswerMap,
    sector: Option<String>,
    size_bucket: Option<String>,
) -> ScoreOutput {
    let mut profile = RespondentProfile::from_answers(&answers);
    profile.override_cohort(sector, size_bucket);

    let scores = calculator.compute_scores(&answers);
    let resolution = resolver
        .resolve_cohort(profile.sector.as_deref(), profile.size_bucket.as_deref())
        .await;
    let report = ScoreReport::assemble(&scores, &resolution);

    ScoreOutput {
        profile,
        scores,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsb_index::benchmarks::{BenchmarkOrigin, CsvBenchmarkSource, LookupFailure};
    use std::io::Write;
    use std::sync::Arc;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn answers_file_normalizes_form_keys() {
        let file = write_temp(
            r#"{"Pregunta-1":"q1-80","P2":"q2-60","p3.1-12.5":"on","Sector":"Manufactura","P4":""}"#,
        );

        let answers = load_answers(file.path()).expect("answers");

        assert_eq!(answers.get("P1"), Some("q1-80"));
        assert_eq!(answers.get("P4"), None);
        assert_eq!(answers.get("Sector"), Some("Manufactura"));
    }

    #[test]
    fn schema_file_round_trips_through_validation() {
        let bundled = serde_json::to_string(&SchemaVersion::SheetsV3.schema()).expect("json");
        let file = write_temp(&bundled);

        let schema = load_schema(file.path()).expect("schema");

        assert_eq!(schema.id, "sheets-v3");
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn malformed_schema_file_is_a_json_error() {
        let file = write_temp("{\"id\": 3}");
        assert!(matches!(load_schema(file.path()), Err(AppError::Json(_))));
    }

    #[tokio::test]
    async fn score_uses_answer_cohort_when_flags_absent() {
        let table = "sector,size_bucket,estrategia_empresarial\nManufactura,Pequeña,52.95\n";
        let source = CsvBenchmarkSource::from_reader(table.as_bytes()).expect("table");
        let resolver = BenchmarkResolver::new(
            Arc::new(source),
            vec!["estrategia_empresarial".to_string()],
        );
        let calculator =
            ScoreCalculator::new(SchemaVersion::SheetsV2.schema()).expect("bundled schema");
        let answers: AnswerMap = [
            ("P1", "q1-80"),
            ("P2", "q2-60"),
            ("p3.1-12.5", "on"),
            ("p3.4-12.5", "on"),
            ("Sector", "Manufactura"),
            ("Tamaño-de-tu-empresa", "Pequeña"),
        ]
        .into_iter()
        .collect();

        let output = score(&calculator, &resolver, answers, None, None).await;

        assert!(output.report.benchmark_available);
        let estrategia = output
            .report
            .entry("estrategia_empresarial")
            .expect("entry");
        assert_eq!(estrategia.delta_label, "+2.1%");
    }

    #[tokio::test]
    async fn score_without_cohort_falls_back() {
        let resolver = BenchmarkResolver::new(
            Arc::new(gsb_index::benchmarks::UnconfiguredSource),
            SchemaVersion::SheetsV2.schema().metric_names(),
        );
        let calculator =
            ScoreCalculator::new(SchemaVersion::SheetsV2.schema()).expect("bundled schema");

        let output = score(&calculator, &resolver, AnswerMap::new(), None, None).await;

        assert!(!output.report.benchmark_available);
        assert_eq!(output.scores.composite, 0.0);
    }

    fn renamed_schema() -> ScoringSchema {
        let mut schema = SchemaVersion::SheetsV2.schema();
        schema.id = "planta-local".to_string();
        for theme in schema
            .pillars
            .iter_mut()
            .flat_map(|pillar| pillar.sub_themes.iter_mut())
        {
            theme.key = format!("planta_{}", theme.key);
        }
        schema
    }

    #[tokio::test]
    async fn custom_schema_is_compared_against_its_own_metrics() {
        let schema = renamed_schema();
        let metrics = schema.metric_names();
        let header = metrics.join(",");
        let row = vec!["50"; metrics.len()].join(",");
        let table = write_temp(&format!(
            "sector,size_bucket,{header}\nManufactura,Pequeña,{row}\n"
        ));
        let config = AppConfig::load().expect("config loads with defaults");

        let resolver =
            build_resolver(&config, metrics.clone(), Some(table.path())).expect("resolver");
        let calculator = ScoreCalculator::new(schema).expect("custom schema");
        let output = score(
            &calculator,
            &resolver,
            AnswerMap::new(),
            Some("Manufactura".to_string()),
            Some("Pequeña".to_string()),
        )
        .await;

        assert_eq!(resolver.required_metrics(), metrics.as_slice());
        assert!(!metrics.iter().any(|name| name == "impacto_climatico"));
        assert!(output.report.benchmark_available);
        assert_eq!(output.report.benchmark_origin, BenchmarkOrigin::Remote);
        let entry = output
            .report
            .entry("planta_impacto_climatico")
            .expect("custom entry");
        assert_eq!(entry.sector_value, 50.0);
    }

    #[tokio::test]
    async fn blank_sector_flag_without_answer_skips_lookup() {
        let table = "sector,size_bucket,estrategia_empresarial\n,Pequeña,52.95\n";
        let source = CsvBenchmarkSource::from_reader(table.as_bytes()).expect("table");
        let resolver = BenchmarkResolver::new(
            Arc::new(source),
            vec!["estrategia_empresarial".to_string()],
        );
        let calculator =
            ScoreCalculator::new(SchemaVersion::SheetsV2.schema()).expect("bundled schema");
        let answers: AnswerMap = [("Tamaño-de-tu-empresa", "Pequeña")].into_iter().collect();

        let output = score(
            &calculator,
            &resolver,
            answers,
            Some("  ".to_string()),
            None,
        )
        .await;

        assert!(output.profile.sector.is_none());
        assert_eq!(
            output.report.benchmark_origin,
            BenchmarkOrigin::Fallback {
                reason: LookupFailure::MissingCohort
            }
        );
        assert!(resolver.cached("", "Pequeña").is_none());
    }
}
