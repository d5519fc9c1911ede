mod common;

use common::{results, scenario, with};
use pension_report::classify::{SectionKind, SkipReason, classify, disability_result};
use pension_report::model::PensionType;
use serde_json::json;

fn increase(months: u32, percentage: f64, final_amount: f64) -> serde_json::Value {
    json!({
        "aumentoTemporal": {
            "meses": months,
            "porcentaje": percentage,
            "pensionAumentada": 0.0,
            "pensionFinal": final_amount,
        }
    })
}

fn kinds(c: &pension_report::classify::Classification<'_>) -> Vec<&'static str> {
    c.sections.iter().map(|s| s.kind.as_str()).collect()
}

#[test]
fn drawdown_and_immediate_are_numbered_in_order() {
    let list = results(vec![
        scenario("RV Inmediata Simple", 400_000.0),
        scenario("Retiro Programado", 500_000.0),
    ]);
    let c = classify(&list, PensionType::Vejez);

    assert_eq!(kinds(&c), ["drawdown", "immediate"]);
    assert_eq!(c.sections[0].number, 1);
    assert_eq!(c.sections[1].number, 2);
    assert_eq!(c.sections[0].kind.result().name, "Retiro Programado");
    assert!(c.skipped.is_empty());
}

#[test]
fn guaranteed_and_increased_buckets_are_disjoint() {
    let list = results(vec![
        with(scenario("RV Garantizada 10", 380_000.0), json!({"periodoGarantizado": 120})),
        with(scenario("RV Aumento 2x", 600_000.0), increase(24, 0.5, 400_000.0)),
        with(
            with(scenario("RV Aumento + Garantia", 590_000.0), json!({"periodoGarantizado": 240})),
            increase(36, 1.0, 295_000.0),
        ),
        with(scenario("RV Garantizada 20", 360_000.0), json!({"periodoGarantizado": 240})),
    ]);
    let c = classify(&list, PensionType::Vejez);

    assert_eq!(kinds(&c), ["guaranteed", "guaranteed", "increased", "increased"]);
    for section in &c.sections {
        let r = section.kind.result();
        match section.kind {
            SectionKind::GuaranteedAnnuity { months, .. } => {
                assert!(r.temporary_increase.is_none());
                assert_eq!(Some(months), r.guaranteed_months);
            }
            SectionKind::IncreasedAnnuity {
                increase,
                guaranteed_months,
                ..
            } => {
                assert!(r.temporary_increase.is_some());
                assert_eq!(increase.months, r.temporary_increase.unwrap().months);
                assert_eq!(guaranteed_months, r.guaranteed_months);
            }
            other => panic!("unexpected section {other:?}"),
        }
    }
    let numbers: Vec<usize> = c.sections.iter().map(|s| s.number).collect();
    assert_eq!(numbers, [1, 2, 3, 4]);
    // list order within a bucket
    assert_eq!(c.sections[0].kind.result().name, "RV Garantizada 10");
    assert_eq!(c.sections[1].kind.result().name, "RV Garantizada 20");
}

#[test]
fn zero_guarantee_counts_as_immediate() {
    let list = results(vec![with(
        scenario("RV Inmediata", 400_000.0),
        json!({"periodoGarantizado": 0}),
    )]);
    let c = classify(&list, PensionType::Vejez);
    assert_eq!(kinds(&c), ["immediate"]);
}

#[test]
fn unmatched_and_duplicate_results_are_reported() {
    let list = results(vec![
        scenario("Retiro Programado", 500_000.0),
        scenario("Retiro Programado", 510_000.0),
        scenario("Otro Producto", 100_000.0),
    ]);
    let c = classify(&list, PensionType::Vejez);

    assert_eq!(kinds(&c), ["drawdown"]);
    assert_eq!(c.sections[0].kind.result().monthly_pension, 500_000.0);
    assert_eq!(c.skipped.len(), 2);
    assert_eq!(c.skipped[0].index, 1);
    assert_eq!(c.skipped[0].reason, SkipReason::Duplicate);
    assert_eq!(c.skipped[1].index, 2);
    assert_eq!(c.skipped[1].reason, SkipReason::Unmatched);
    assert!(c.skipped[1].to_string().contains("Otro Producto"));
}

#[test]
fn drawdown_named_result_with_guarantee_fills_both_buckets() {
    let list = results(vec![with(
        scenario("Retiro Programado Garantizado", 480_000.0),
        json!({"periodoGarantizado": 120}),
    )]);
    let c = classify(&list, PensionType::Vejez);

    assert_eq!(kinds(&c), ["drawdown", "guaranteed"]);
    assert!(c.sections.iter().all(|s| s.kind.result().name == "Retiro Programado Garantizado"));
    assert!(c.skipped.is_empty());

    // an explicit kind keeps it in one bucket
    let list = results(vec![with(
        scenario("Retiro Programado Garantizado", 480_000.0),
        json!({"periodoGarantizado": 120, "modalidad": "retiro_programado"}),
    )]);
    assert_eq!(kinds(&classify(&list, PensionType::Vejez)), ["drawdown"]);
}

#[test]
fn explicit_kind_overrides_name() {
    let list = results(vec![
        with(scenario("Escenario A", 500_000.0), json!({"modalidad": "retiro_programado"})),
        with(scenario("Escenario B", 400_000.0), json!({"modalidad": "rv_inmediata"})),
        with(scenario("Escenario C", 100_000.0), json!({"modalidad": "sobrevivencia"})),
    ]);
    let c = classify(&list, PensionType::Vejez);

    assert_eq!(kinds(&c), ["drawdown", "immediate"]);
    assert_eq!(c.skipped.len(), 1);
    assert_eq!(c.skipped[0].reason, SkipReason::WrongPensionType);
}

#[test]
fn old_age_annuity_kind_is_bucketed_by_shape() {
    let list = results(vec![with(
        scenario("Escenario", 380_000.0),
        json!({"modalidad": "rv_inmediata", "periodoGarantizado": 120}),
    )]);
    let c = classify(&list, PensionType::Vejez);
    assert_eq!(kinds(&c), ["guaranteed"]);
}

#[test]
fn disability_sections_follow_fixed_order() {
    let list = results(vec![
        with(
            scenario("RV Invalidez + 50% x 24m", 600_000.0),
            increase(24, 50.0, 400_000.0),
        ),
        with(
            scenario("RV Invalidez Garantia 10 anos", 380_000.0),
            json!({"periodoGarantizado": 120}),
        ),
        scenario("RV Inmediata Invalidez", 400_000.0),
        scenario("Retiro Programado Invalidez", 450_000.0),
    ]);
    let c = classify(&list, PensionType::Invalidez);

    assert_eq!(kinds(&c), ["drawdown", "immediate", "guaranteed", "increased"]);
    let numbers: Vec<usize> = c.sections.iter().map(|s| s.number).collect();
    assert_eq!(numbers, [1, 2, 3, 4]);
}

#[test]
fn bare_disability_pension_only_when_alone() {
    let alone = results(vec![scenario("Pension Invalidez Total", 300_000.0)]);
    let c = classify(&alone, PensionType::Invalidez);
    assert_eq!(kinds(&c), ["disability"]);

    let mixed = results(vec![
        scenario("Retiro Programado Invalidez", 450_000.0),
        scenario("Pension Invalidez Total", 300_000.0),
    ]);
    let c = classify(&mixed, PensionType::Invalidez);
    assert_eq!(kinds(&c), ["drawdown"]);
    assert_eq!(c.skipped.len(), 1);
    assert_eq!(c.skipped[0].reason, SkipReason::NotSoleResult);

    // still available as the grade source
    let source = disability_result(&mixed).expect("disability result");
    assert_eq!(source.name, "Pension Invalidez Total");
}

#[test]
fn survivor_results_keep_input_order() {
    let list = results(vec![
        scenario("Pension Conyuge", 300_000.0),
        scenario("Retiro Programado", 500_000.0),
        scenario("Pension Hijos", 150_000.0),
    ]);
    let c = classify(&list, PensionType::Sobrevivencia);

    assert_eq!(kinds(&c), ["survivor", "survivor", "survivor"]);
    let names: Vec<&str> = c.sections.iter().map(|s| s.kind.result().name.as_str()).collect();
    assert_eq!(names, ["Pension Conyuge", "Retiro Programado", "Pension Hijos"]);
    assert!(c.skipped.is_empty());
}

#[test]
fn empty_list_has_no_sections() {
    let c = classify(&[], PensionType::Vejez);
    assert!(c.sections.is_empty());
    assert!(c.skipped.is_empty());
}

#[test]
fn sections_compare_by_value() {
    let list = results(vec![
        scenario("Retiro Programado", 500_000.0),
        with(scenario("RV Garantizada", 380_000.0), json!({"periodoGarantizado": 120})),
    ]);
    let copy = list.clone();
    let a = classify(&list, PensionType::Vejez);
    let b = classify(&copy, PensionType::Vejez);

    assert_eq!(a.sections, b.sections);
    assert_ne!(a.sections[0], b.sections[1]);
}
