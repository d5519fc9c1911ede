use crate::model::PensionType;

const BENEFICIARY_LABELS: &[(&str, &str)] = &[
    ("conyuge", "Conyuge"),
    ("conviviente", "Conviviente"),
    ("hijo", "Hijo/a"),
    ("padre", "Padre"),
    ("madre", "Madre"),
];

const DISABILITY_GRADE_LABELS: &[(&str, &str)] = &[
    ("total", "Total (70%)"),
    ("total_2_3", "Total 2/3 (50%)"),
    ("parcial", "Parcial (35%)"),
];

fn lookup<'a>(table: &[(&str, &'static str)], code: &'a str) -> &'a str {
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|&(_, label)| label)
        .unwrap_or(code)
}

pub fn pension_type_label(pension_type: PensionType) -> &'static str {
    match pension_type {
        PensionType::Vejez => "Vejez (Edad Legal o Anticipada)",
        PensionType::Invalidez => "Invalidez",
        PensionType::Sobrevivencia => "Sobrevivencia",
    }
}

/// Display label for a beneficiary kind; unknown codes are shown verbatim.
pub fn beneficiary_label(code: &str) -> &str {
    lookup(BENEFICIARY_LABELS, code)
}

/// Display label for a disability grade; unknown codes are shown verbatim.
pub fn disability_grade_label(code: &str) -> &str {
    lookup(DISABILITY_GRADE_LABELS, code)
}
