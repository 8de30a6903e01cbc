use super::common::*;
use crate::scoring::{
    compute_scores, promote_single_checkbox_to_full, AnswerMap, PillarKind, SchemaVersion,
    COMPOSITE_METRIC,
};

#[test]
fn empty_answers_score_zero_everywhere() {
    for version in SchemaVersion::ALL {
        let result = calculator(version).compute_scores(&AnswerMap::new());

        assert!(result.sub_themes.iter().all(|theme| theme.value == 0.0));
        assert!(result.pillars.iter().all(|pillar| pillar.value == 0.0));
        assert_eq!(result.composite, 0.0);
    }
}

#[test]
fn strategy_mixes_single_choice_and_checkbox_sum() {
    let result = calculator(SchemaVersion::SheetsV2).compute_scores(&strategy_answers());

    assert_eq!(result.sub_theme("estrategia_empresarial"), Some(55.0));
    assert_close(result.pillar(PillarKind::Governance), 55.0 / 4.0);
    assert_close(result.composite, 55.0 / 12.0);
    assert_eq!(result.pillar(PillarKind::Environmental), 0.0);
}

#[test]
fn pillars_average_their_sub_themes() {
    let answers = answers(&[("P8", "a-100"), ("p13.1-14.29", "on"), ("p13.2-14.29", "on")]);
    let result = calculator(SchemaVersion::SheetsV2).compute_scores(&answers);

    assert_close(result.sub_theme("interno").expect("interno"), 20.0);
    assert_close(result.sub_theme("externo").expect("externo"), 28.58);
    assert_close(result.pillar(PillarKind::Social), (20.0 + 28.58) / 2.0);
}

#[test]
fn question_batteries_are_averaged_before_joining_the_sub_theme() {
    let answers = answers(&[("P14.1", "x-70"), ("P14.2", "x-0"), ("P15", "x-50")]);
    let result = calculator(SchemaVersion::SheetsV2).compute_scores(&answers);

    assert_close(
        result.sub_theme("proveedores").expect("proveedores"),
        (10.0 + 50.0 + 0.0) / 3.0,
    );
}

#[test]
fn rounded_option_weights_override_encoded_weights() {
    let answers = answers(&[("p5.1-16.66666667", "on"), ("p5.2-16.66666667", "on")]);
    let result = calculator(SchemaVersion::SheetsV2).compute_scores(&answers);

    assert_close(
        result.sub_theme("codigo_etico").expect("codigo_etico"),
        33.34 / 4.0,
    );
}

#[test]
fn zero_weight_none_option_adds_nothing() {
    let answers = answers(&[("p26.4-0", "on")]);
    let result = calculator(SchemaVersion::SheetsV2).compute_scores(&answers);

    assert_eq!(result.sub_theme("eco_financiero"), Some(0.0));
}

#[test]
fn values_above_scale_are_not_clamped() {
    let answers = answers(&[("P27", "x-250")]);
    let result = calculator(SchemaVersion::SheetsV2).compute_scores(&answers);

    assert_close(result.sub_theme("eco_financiero").expect("eco"), 62.5);
}

#[test]
fn malformed_answers_contribute_zero() {
    let answers = answers(&[("P1", "q1-abc"), ("P2", "on"), ("P4", "x-40")]);
    let result = calculator(SchemaVersion::SheetsV2).compute_scores(&answers);

    assert_eq!(result.sub_theme("estrategia_empresarial"), Some(0.0));
    assert_close(result.sub_theme("codigo_etico").expect("codigo"), 10.0);
}

#[test]
fn promotion_rule_only_hits_the_single_checkbox_window() {
    assert_eq!(promote_single_checkbox_to_full(14.29), 100.0);
    assert_eq!(promote_single_checkbox_to_full(14.295), 100.0);
    assert_eq!(promote_single_checkbox_to_full(14.285), 100.0);
    assert_eq!(promote_single_checkbox_to_full(14.28), 14.28);
    assert_eq!(promote_single_checkbox_to_full(14.30), 14.30);
    assert_eq!(promote_single_checkbox_to_full(0.0), 0.0);
}

#[test]
fn promotion_applies_only_where_the_schema_marks_it() {
    let answers = answers(&[("P17", "r-14.29")]);

    let promoted = calculator(SchemaVersion::SheetsV3).compute_scores(&answers);
    let plain = calculator(SchemaVersion::SheetsV2).compute_scores(&answers);

    assert_close(
        promoted.sub_theme("impacto_climatico").expect("climate"),
        100.0 / 6.0,
    );
    assert_close(
        plain.sub_theme("impacto_climatico").expect("climate"),
        14.29 / 6.0,
    );
}

#[test]
fn promotion_leaves_values_outside_tolerance() {
    let answers = answers(&[("P17", "r-14.28")]);
    let result = calculator(SchemaVersion::SheetsV3).compute_scores(&answers);

    assert_close(
        result.sub_theme("impacto_climatico").expect("climate"),
        14.28 / 6.0,
    );
}

#[test]
fn metric_lookup_covers_every_level() {
    let result = calculator(SchemaVersion::SheetsV2).compute_scores(&strategy_answers());
    let metrics = result.metrics();

    assert_eq!(metrics.len(), 14);
    assert_eq!(result.metric("estrategia_empresarial"), Some(55.0));
    assert_eq!(
        result.metric("media_gobernanza"),
        Some(result.pillar(PillarKind::Governance))
    );
    assert_eq!(result.metric(COMPOSITE_METRIC), Some(result.composite));
    assert_eq!(result.metric("unknown"), None);
}

#[test]
fn compute_scores_validates_the_schema_first() {
    let mut schema = SchemaVersion::SheetsV2.schema();
    schema.pillars[0].sub_themes[0].components.clear();

    assert!(compute_scores(&strategy_answers(), &schema).is_err());
    assert!(compute_scores(&strategy_answers(), &SchemaVersion::SheetsV2.schema()).is_ok());
}

#[test]
fn sub_themes_keep_schema_order() {
    let result = calculator(SchemaVersion::ChartsV1).compute_scores(&AnswerMap::new());
    let environmental: Vec<&str> = result
        .sub_themes_of(PillarKind::Environmental)
        .map(|theme| theme.key.as_str())
        .collect();

    assert_eq!(
        environmental,
        [
            "impacto_climatico",
            "gestion_sostenible",
            "biodiversidad",
            "gestion_ambiental"
        ]
    );
}
