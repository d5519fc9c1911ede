//! Checks run on a parsed request before anything is drawn, so bad figures
//! fail loudly instead of printing `NaN` into the report.

use crate::error::ValidationError;
use crate::model::{PensionType, ReportRequest, ScenarioResult};

fn finite(field: impl FnOnce() -> String, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new(field(), "must be a finite number"))
    }
}

fn non_negative(field: impl FnOnce() -> String, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new(field(), "must be a non-negative number"))
    }
}

fn fraction(field: impl FnOnce() -> String, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(field(), "must be a fraction between 0 and 1"))
    }
}

pub fn validate(request: &ReportRequest) -> Result<(), ValidationError> {
    let affiliate = &request.affiliate;
    non_negative(|| "afiliado.fondosAcumulados".into(), affiliate.accumulated_funds)?;
    non_negative(|| "afiliado.anosCotizados".into(), affiliate.years_contributed)?;
    if let Some(income) = affiliate.base_income {
        non_negative(|| "afiliado.ingresoBase".into(), income)?;
    }

    let uf = request.parameters.uf;
    if !(uf.is_finite() && uf > 0.0) {
        return Err(ValidationError::new("parametros.uf", "must be a positive number"));
    }

    if request.results.is_empty() {
        return Err(ValidationError::new(
            "resultados",
            "at least one scenario result is required",
        ));
    }
    for (i, result) in request.results.iter().enumerate() {
        validate_result(i, result)?;
    }

    if affiliate.pension_type == PensionType::Sobrevivencia {
        for (i, ben) in request.beneficiaries.iter().enumerate() {
            fraction(
                || format!("beneficiarios[{i}].porcentajePension"),
                ben.pension_share,
            )?;
        }
    }

    Ok(())
}

fn validate_result(i: usize, result: &ScenarioResult) -> Result<(), ValidationError> {
    let field = |name: &str| format!("resultados[{i}].{name}");

    if result.name.trim().is_empty() {
        return Err(ValidationError::new(field("nombre"), "must not be empty"));
    }
    non_negative(|| field("pensionMensual"), result.monthly_pension)?;
    non_negative(|| field("pensionEnUF"), result.pension_uf)?;
    finite(|| field("tasaInteres"), result.interest_rate)?;

    if let Some(inc) = &result.temporary_increase {
        if inc.months == 0 {
            return Err(ValidationError::new(
                field("aumentoTemporal.meses"),
                "must be at least one month",
            ));
        }
        non_negative(|| field("aumentoTemporal.porcentaje"), inc.percentage)?;
        non_negative(|| field("aumentoTemporal.pensionFinal"), inc.final_amount)?;
    }

    for (j, share) in result.beneficiary_shares.iter().enumerate() {
        fraction(
            || field(&format!("pensionPorBeneficiario[{j}].porcentaje")),
            share.share,
        )?;
        non_negative(
            || field(&format!("pensionPorBeneficiario[{j}].pensionMensual")),
            share.monthly_pension,
        )?;
    }

    if let Some(income) = result.base_income {
        non_negative(|| field("ingresoBase"), income)?;
    }

    Ok(())
}
