use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PensionType {
    #[default]
    Vejez,
    Invalidez,
    Sobrevivencia,
}

impl PensionType {
    pub fn as_str(self) -> &'static str {
        match self {
            PensionType::Vejez => "vejez",
            PensionType::Invalidez => "invalidez",
            PensionType::Sobrevivencia => "sobrevivencia",
        }
    }
}

/// One study request: who the affiliate is, the market parameters used and
/// the scenario figures computed upstream.
#[derive(Clone, Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(rename = "afiliado")]
    pub affiliate: Affiliate,
    #[serde(rename = "parametros")]
    pub parameters: Parameters,
    #[serde(rename = "resultados")]
    pub results: Vec<ScenarioResult>,
    #[serde(rename = "beneficiarios", default)]
    pub beneficiaries: Vec<Beneficiary>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Affiliate {
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "sexo", default)]
    pub sex: String,
    #[serde(rename = "edad")]
    pub age: u32,
    #[serde(rename = "fondosAcumulados")]
    pub accumulated_funds: f64,
    #[serde(rename = "anosCotizados", default)]
    pub years_contributed: f64,
    #[serde(rename = "tipoPension", default)]
    pub pension_type: PensionType,
    #[serde(rename = "gradoInvalidez", default)]
    pub disability_grade: Option<String>,
    #[serde(rename = "ingresoBase", default)]
    pub base_income: Option<f64>,
}

impl Affiliate {
    /// Uppercased display name, `AFILIADO` when none was given.
    pub fn display_name(&self) -> String {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "AFILIADO".to_string()
        } else {
            trimmed.to_uppercase()
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Parameters {
    /// Value of one UF in pesos.
    pub uf: f64,
    #[serde(rename = "tasaRP", default)]
    pub drawdown_rate: f64,
    #[serde(rename = "tasaRV", default)]
    pub annuity_rate: f64,
}

/// Explicit scenario discriminant set by the calculation engine. When absent
/// the classifier falls back to matching the scenario name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum ScenarioKind {
    #[serde(rename = "retiro_programado")]
    Drawdown,
    #[serde(rename = "rv_inmediata")]
    ImmediateAnnuity,
    #[serde(rename = "rv_garantizada")]
    GuaranteedAnnuity,
    #[serde(rename = "rv_aumento_temporal")]
    IncreasedAnnuity,
    #[serde(rename = "pension_invalidez")]
    DisabilityPension,
    #[serde(rename = "sobrevivencia")]
    Survivor,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScenarioResult {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "modalidad", default)]
    pub kind: Option<ScenarioKind>,
    #[serde(rename = "pensionMensual")]
    pub monthly_pension: f64,
    #[serde(rename = "pensionEnUF")]
    pub pension_uf: f64,
    #[serde(rename = "pensionAnual", default)]
    pub annual_pension: f64,
    #[serde(default)]
    pub cnu: f64,
    #[serde(rename = "tasaInteres")]
    pub interest_rate: f64,
    #[serde(rename = "expectativaVida", default)]
    pub life_expectancy: f64,
    /// Guaranteed period in months.
    #[serde(rename = "periodoGarantizado", default)]
    pub guaranteed_months: Option<u32>,
    #[serde(rename = "aumentoTemporal", default)]
    pub temporary_increase: Option<TemporaryIncrease>,
    #[serde(rename = "advertencias", default)]
    pub warnings: Vec<String>,
    #[serde(rename = "pensionPorBeneficiario", default)]
    pub beneficiary_shares: Vec<BeneficiaryShare>,
    #[serde(rename = "gradoInvalidez", default)]
    pub disability_grade: Option<String>,
    #[serde(rename = "ingresoBase", default)]
    pub base_income: Option<f64>,
    #[serde(rename = "porcentajeInvalidez", default)]
    pub disability_percentage: Option<f64>,
}

/// Structural shape of a result, derived from which optional annuity
/// features it carries. An increase always wins over a bare guarantee.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScenarioShape<'a> {
    Immediate,
    Guaranteed {
        months: u32,
    },
    Increased(&'a TemporaryIncrease),
    GuaranteedAndIncreased {
        months: u32,
        increase: &'a TemporaryIncrease,
    },
}

impl ScenarioShape<'_> {
    pub fn guaranteed_months(&self) -> Option<u32> {
        match *self {
            ScenarioShape::Guaranteed { months }
            | ScenarioShape::GuaranteedAndIncreased { months, .. } => Some(months),
            ScenarioShape::Immediate | ScenarioShape::Increased(_) => None,
        }
    }
}

impl ScenarioResult {
    pub fn shape(&self) -> ScenarioShape<'_> {
        let months = self.guaranteed_months.filter(|&m| m > 0);
        match (months, self.temporary_increase.as_ref()) {
            (None, None) => ScenarioShape::Immediate,
            (Some(months), None) => ScenarioShape::Guaranteed { months },
            (None, Some(increase)) => ScenarioShape::Increased(increase),
            (Some(months), Some(increase)) => {
                ScenarioShape::GuaranteedAndIncreased { months, increase }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct TemporaryIncrease {
    #[serde(rename = "meses")]
    pub months: u32,
    /// Either a fraction (`0.5`) or a whole percentage (`50`).
    #[serde(rename = "porcentaje")]
    pub percentage: f64,
    #[serde(rename = "pensionAumentada", default)]
    pub increased_amount: f64,
    /// Monthly pension once the increase period ends.
    #[serde(rename = "pensionFinal")]
    pub final_amount: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BeneficiaryShare {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "porcentaje")]
    pub share: f64,
    #[serde(rename = "pensionMensual")]
    pub monthly_pension: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Beneficiary {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "edad")]
    pub age: u32,
    #[serde(rename = "sexo", default)]
    pub sex: String,
    #[serde(rename = "porcentajePension")]
    pub pension_share: f64,
}
