//! Bundled questionnaire revisions.
//!
//! The revisions disagree on which sub-questions feed "Impacto Climático" and "Gestión
//! Ambiental", and on how a ticked checkbox is encoded. Each one is kept as its own schema so
//! callers pick a revision by [`SchemaVersion`] instead of by code path.

use super::answers::{CheckboxSelection, QuestionId};
use super::schema::{
    CheckboxGroup, CheckboxOption, Component, PillarKind, PillarSpec, SchemaVersion,
    ScoringSchema, SubThemeSpec,
};

/// Rounded weight the result pages apply to the six-option groups keyed `...-16.66666667`.
const SIXTH_WEIGHT: f64 = 16.67;

pub(crate) fn bundled(version: SchemaVersion) -> ScoringSchema {
    let revision = Revision::of(version);

    ScoringSchema {
        id: version.as_str().to_string(),
        pillars: vec![
            PillarSpec {
                kind: PillarKind::Environmental,
                sub_themes: vec![
                    impacto_climatico(&revision),
                    gestion_sostenible(&revision),
                    biodiversidad(),
                    gestion_ambiental(&revision),
                ],
            },
            PillarSpec {
                kind: PillarKind::Social,
                sub_themes: vec![interno(&revision), externo(&revision)],
            },
            PillarSpec {
                kind: PillarKind::Governance,
                sub_themes: vec![
                    estrategia_empresarial(&revision),
                    eco_financiero(&revision),
                    proveedores(),
                    codigo_etico(&revision),
                ],
            },
        ],
    }
}

struct Revision {
    selection: CheckboxSelection,
    climate_includes_p17: bool,
    promote_p17: bool,
    p21_parts: usize,
}

impl Revision {
    fn of(version: SchemaVersion) -> Self {
        match version {
            SchemaVersion::ChartsV1 => Self {
                selection: CheckboxSelection::KeyPresent,
                climate_includes_p17: false,
                promote_p17: false,
                p21_parts: 4,
            },
            SchemaVersion::SheetsV2 => Self {
                selection: CheckboxSelection::KeyPresent,
                climate_includes_p17: true,
                promote_p17: false,
                p21_parts: 2,
            },
            SchemaVersion::SheetsV3 => Self {
                selection: CheckboxSelection::ValueOn,
                climate_includes_p17: true,
                promote_p17: true,
                p21_parts: 2,
            },
        }
    }
}

fn impacto_climatico(revision: &Revision) -> SubThemeSpec {
    let mut components = Vec::with_capacity(6);
    if revision.climate_includes_p17 {
        components.push(Component::Question {
            id: QuestionId::from("P17"),
            promote_single_checkbox: revision.promote_p17,
        });
    }
    components.extend(questions(&["P18", "P21.3", "P22.5", "P22.1", "P22.2"]));
    theme("impacto_climatico", "Impacto Climático", components)
}

fn gestion_sostenible(revision: &Revision) -> SubThemeSpec {
    let mut components = vec![checkbox_group(
        "P23",
        revision.selection,
        (1..=6)
            .map(|n| CheckboxOption::new(format!("p23.{n}-16.66666667")).with_weight(SIXTH_WEIGHT))
            .chain(std::iter::once(CheckboxOption::new("p23.7-0")))
            .collect(),
    )];
    components.extend(questions(&["P19", "P22.3", "P22.4", "P22.6"]));
    theme("gestion_sostenible", "Gestión Sostenible", components)
}

fn biodiversidad() -> SubThemeSpec {
    theme(
        "biodiversidad",
        "Biodiversidad y Ecosistemas",
        questions(&["P22.7", "P21.4", "P20"]),
    )
}

fn gestion_ambiental(revision: &Revision) -> SubThemeSpec {
    theme(
        "gestion_ambiental",
        "Gestión Ambiental",
        vec![question("P24"), battery("P21", revision.p21_parts)],
    )
}

fn interno(revision: &Revision) -> SubThemeSpec {
    theme(
        "interno",
        "Interno",
        vec![
            question("P8"),
            battery("P9", 8),
            question("P10"),
            checkbox_group(
                "P11",
                revision.selection,
                keyed_options(&["p11.1-25", "p11.2-25", "p11.3-25", "p11.4-25", "p11.5-0"]),
            ),
            battery("P12", 8),
        ],
    )
}

fn externo(revision: &Revision) -> SubThemeSpec {
    theme(
        "externo",
        "Externo",
        vec![checkbox_group(
            "P13",
            revision.selection,
            (1..=7)
                .map(|n| CheckboxOption::new(format!("p13.{n}-14.29")))
                .collect(),
        )],
    )
}

fn estrategia_empresarial(revision: &Revision) -> SubThemeSpec {
    let mut components = questions(&["P1", "P2"]);
    components.push(checkbox_group(
        "P3",
        revision.selection,
        (1..=8)
            .map(|n| CheckboxOption::new(format!("p3.{n}-12.5")))
            .collect(),
    ));
    theme("estrategia_empresarial", "Estrategia Empresarial", components)
}

fn eco_financiero(revision: &Revision) -> SubThemeSpec {
    theme(
        "eco_financiero",
        "Eco-Financiero",
        vec![
            battery("P25", 7),
            checkbox_group(
                "P26",
                revision.selection,
                keyed_options(&["p26.1-33.33", "p26.2-33.33", "p26.3-33.33", "p26.4-0"]),
            ),
            question("P27"),
            question("P28"),
        ],
    )
}

fn proveedores() -> SubThemeSpec {
    theme(
        "proveedores",
        "Proveedores",
        vec![battery("P14", 7), question("P15"), question("P16")],
    )
}

fn codigo_etico(revision: &Revision) -> SubThemeSpec {
    theme(
        "codigo_etico",
        "Código Ético",
        vec![
            question("P4"),
            checkbox_group(
                "P5",
                revision.selection,
                (1..=6)
                    .map(|n| {
                        CheckboxOption::new(format!("p5.{n}-16.66666667")).with_weight(SIXTH_WEIGHT)
                    })
                    .collect(),
            ),
            question("P6"),
            question("P7"),
        ],
    )
}

fn theme(key: &str, label: &str, components: Vec<Component>) -> SubThemeSpec {
    SubThemeSpec {
        key: key.to_string(),
        label: label.to_string(),
        components,
    }
}

fn question(id: &str) -> Component {
    Component::Question {
        id: QuestionId::from(id),
        promote_single_checkbox: false,
    }
}

fn questions(ids: &[&str]) -> Vec<Component> {
    ids.iter().map(|id| question(id)).collect()
}

/// `P9` with 8 parts becomes the mean of `P9.1` through `P9.8`.
fn battery(id: &str, parts: usize) -> Component {
    Component::Mean {
        id: id.to_string(),
        questions: (1..=parts)
            .map(|n| QuestionId::new(format!("{id}.{n}")))
            .collect(),
    }
}

fn keyed_options(keys: &[&str]) -> Vec<CheckboxOption> {
    keys.iter().map(|key| CheckboxOption::new(*key)).collect()
}

fn checkbox_group(
    id: &str,
    selection: CheckboxSelection,
    options: Vec<CheckboxOption>,
) -> Component {
    Component::Checkbox(CheckboxGroup {
        id: id.to_string(),
        selection,
        options,
        promote_single_checkbox: false,
    })
}
