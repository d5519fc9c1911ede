use pension_report::config::Deductions;
use pension_report::figures::{Figures, IncreaseDelta, to_uf};
use proptest::prelude::*;

#[test]
fn drawdown_deductions_are_rounded_separately() {
    let f = Figures::drawdown(500_000.0, &Deductions::default());
    assert_eq!(f.drawdown_fee, 4_750.0);
    assert_eq!(f.health, 35_000.0);
    assert_eq!(f.liquid, 460_250.0);
    assert_eq!(f.with_supplement, None);

    // 0.95% of 123_457 = 1172.84, 7% = 8641.99
    let f = Figures::drawdown(123_457.0, &Deductions::default());
    assert_eq!(f.drawdown_fee, 1_173.0);
    assert_eq!(f.health, 8_642.0);
    assert_eq!(f.liquid, 123_457.0 - 1_173.0 - 8_642.0);
}

#[test]
fn annuities_carry_the_supplement() {
    let f = Figures::annuity(400_000.0, &Deductions::default(), 224_004.0);
    assert_eq!(f.drawdown_fee, 0.0);
    assert_eq!(f.health, 28_000.0);
    assert_eq!(f.liquid, 372_000.0);
    assert_eq!(f.with_supplement, Some(596_004.0));
}

#[test]
fn increase_delta() {
    let d = Deductions::default();
    let during = Figures::annuity(600_000.0, &d, 224_004.0);
    let after = Figures::annuity(400_000.0, &d, 224_004.0);
    let delta = IncreaseDelta::between(&during, &after);
    assert_eq!(delta.difference, 186_000.0);
    assert_eq!(delta.percent, Some(50.0));

    let zero = Figures::annuity(0.0, &d, 224_004.0);
    let delta = IncreaseDelta::between(&zero, &zero);
    assert_eq!(delta.difference, 0.0);
    assert_eq!(delta.percent, None);

    assert!((to_uf(400_000.0, 38_500.0) - 10.389_61).abs() < 1e-4);
}

proptest! {
    #[test]
    fn liquid_is_gross_minus_deductions(gross in 0u32..50_000_000u32) {
        let gross = f64::from(gross);
        let d = Deductions::default();

        let rp = Figures::drawdown(gross, &d);
        prop_assert_eq!(rp.liquid, gross - rp.total_deductions());
        prop_assert_eq!(rp.drawdown_fee, (gross * 0.0095).round());
        prop_assert_eq!(rp.health, (gross * 0.07).round());

        let rv = Figures::annuity(gross, &d, 224_004.0);
        prop_assert_eq!(rv.liquid, gross - rv.total_deductions());
        prop_assert_eq!(rv.total_deductions(), rv.health);
    }
}
