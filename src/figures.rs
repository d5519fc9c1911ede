use crate::config::Deductions;

/// Amounts shown on one scenario row, in pesos.
///
/// Each deduction is rounded on its own and the liquid amount is the gross
/// pension minus exactly those rounded deductions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Figures {
    pub gross: f64,
    /// Zero for annuities.
    pub drawdown_fee: f64,
    pub health: f64,
    pub liquid: f64,
    /// Liquid amount plus the flat supplement; annuities only.
    pub with_supplement: Option<f64>,
}

impl Figures {
    pub fn drawdown(gross: f64, deductions: &Deductions) -> Self {
        let drawdown_fee = (gross * deductions.drawdown_fee_rate).round();
        let health = (gross * deductions.health_rate).round();
        Self {
            gross,
            drawdown_fee,
            health,
            liquid: gross - drawdown_fee - health,
            with_supplement: None,
        }
    }

    pub fn annuity(gross: f64, deductions: &Deductions, supplement: f64) -> Self {
        let health = (gross * deductions.health_rate).round();
        let liquid = gross - health;
        Self {
            gross,
            drawdown_fee: 0.0,
            health,
            liquid,
            with_supplement: Some(liquid + supplement),
        }
    }

    pub fn total_deductions(&self) -> f64 {
        self.drawdown_fee + self.health
    }
}

/// How much less the pension pays once a temporary increase ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncreaseDelta {
    pub difference: f64,
    /// Relative to the post-increase liquid amount; `None` when that is zero.
    pub percent: Option<f64>,
}

impl IncreaseDelta {
    pub fn between(during: &Figures, after: &Figures) -> Self {
        let difference = during.liquid - after.liquid;
        let percent = (after.liquid != 0.0).then(|| difference / after.liquid * 100.0);
        Self {
            difference,
            percent,
        }
    }
}

/// Pension amount expressed in UF.
pub fn to_uf(amount: f64, uf: f64) -> f64 {
    amount / uf
}
