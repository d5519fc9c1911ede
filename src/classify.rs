//! Partition scenario results into the ordered, numbered sections of a report.
//!
//! Results carrying an explicit [`ScenarioKind`] are bucketed by it. Results
//! without one are recognised by the names the calculation engine gives them,
//! which is the only signal older payloads carry.

use std::fmt;

use crate::model::{PensionType, ScenarioKind, ScenarioResult, ScenarioShape};

/// Increase terms resolved for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncreaseTerms {
    pub months: u32,
    /// As supplied: a fraction or a whole percentage.
    pub percentage: f64,
    /// Gross monthly pension once the increase ends.
    pub final_amount: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SectionKind<'a> {
    Drawdown(&'a ScenarioResult),
    ImmediateAnnuity(&'a ScenarioResult),
    GuaranteedAnnuity {
        result: &'a ScenarioResult,
        months: u32,
    },
    IncreasedAnnuity {
        result: &'a ScenarioResult,
        increase: IncreaseTerms,
        guaranteed_months: Option<u32>,
    },
    DisabilityPension(&'a ScenarioResult),
    Survivor(&'a ScenarioResult),
}

impl<'a> SectionKind<'a> {
    pub fn result(&self) -> &'a ScenarioResult {
        match *self {
            SectionKind::Drawdown(r)
            | SectionKind::ImmediateAnnuity(r)
            | SectionKind::DisabilityPension(r)
            | SectionKind::Survivor(r) => r,
            SectionKind::GuaranteedAnnuity { result, .. }
            | SectionKind::IncreasedAnnuity { result, .. } => result,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Drawdown(_) => "drawdown",
            SectionKind::ImmediateAnnuity(_) => "immediate",
            SectionKind::GuaranteedAnnuity { .. } => "guaranteed",
            SectionKind::IncreasedAnnuity { .. } => "increased",
            SectionKind::DisabilityPension(_) => "disability",
            SectionKind::Survivor(_) => "survivor",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Section<'a> {
    /// 1-based position in the report.
    pub number: usize,
    pub kind: SectionKind<'a>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No bucket recognises the result.
    Unmatched,
    /// A single-slot bucket was already filled by an earlier result.
    Duplicate,
    /// A bare disability pension is only shown when it is the only result.
    NotSoleResult,
    /// The explicit kind does not exist for this pension type.
    WrongPensionType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Skipped {
    pub index: usize,
    pub name: String,
    pub reason: SkipReason,
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let why = match self.reason {
            SkipReason::Unmatched => "does not match any report section",
            SkipReason::Duplicate => "duplicates a section already filled",
            SkipReason::NotSoleResult => "is only shown when it is the sole result",
            SkipReason::WrongPensionType => "does not apply to this pension type",
        };
        write!(f, "result #{} \"{}\" skipped: {}", self.index + 1, self.name, why)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Classification<'a> {
    pub sections: Vec<Section<'a>>,
    pub skipped: Vec<Skipped>,
}

#[derive(Default)]
struct Buckets<'a> {
    drawdown: Option<&'a ScenarioResult>,
    immediate: Option<&'a ScenarioResult>,
    guaranteed: Vec<SectionKind<'a>>,
    increased: Vec<SectionKind<'a>>,
    disability: Option<&'a ScenarioResult>,
    skipped: Vec<Skipped>,
}

fn skip(skipped: &mut Vec<Skipped>, index: usize, result: &ScenarioResult, reason: SkipReason) {
    let entry = Skipped {
        index,
        name: result.name.clone(),
        reason,
    };
    log::warn!("{entry}");
    skipped.push(entry);
}

fn fill_slot<'a>(
    slot: &mut Option<&'a ScenarioResult>,
    skipped: &mut Vec<Skipped>,
    index: usize,
    result: &'a ScenarioResult,
) {
    if slot.is_some() {
        skip(skipped, index, result, SkipReason::Duplicate);
    } else {
        *slot = Some(result);
    }
}

impl<'a> Buckets<'a> {
    /// Fixed order: drawdown, immediate, guaranteed, increased, disability.
    /// Numbers follow the final position so they always match what is drawn.
    fn into_classification(self) -> Classification<'a> {
        let kinds = self
            .drawdown
            .map(SectionKind::Drawdown)
            .into_iter()
            .chain(self.immediate.map(SectionKind::ImmediateAnnuity))
            .chain(self.guaranteed)
            .chain(self.increased)
            .chain(self.disability.map(SectionKind::DisabilityPension));
        Classification {
            sections: number(kinds),
            skipped: self.skipped,
        }
    }
}

fn number<'a>(kinds: impl IntoIterator<Item = SectionKind<'a>>) -> Vec<Section<'a>> {
    kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| Section {
            number: i + 1,
            kind,
        })
        .collect()
}

pub fn classify(results: &[ScenarioResult], pension_type: PensionType) -> Classification<'_> {
    let classification = match pension_type {
        PensionType::Vejez => classify_old_age(results),
        PensionType::Invalidez => classify_disability(results),
        PensionType::Sobrevivencia => Classification {
            sections: number(results.iter().map(SectionKind::Survivor)),
            skipped: Vec::new(),
        },
    };
    log::debug!(
        "CLASSIFY {} results={} sections={} skipped={}",
        pension_type.as_str(),
        results.len(),
        classification.sections.len(),
        classification.skipped.len()
    );
    classification
}

fn increase_terms(result: &ScenarioResult) -> IncreaseTerms {
    match &result.temporary_increase {
        Some(inc) => IncreaseTerms {
            months: inc.months,
            percentage: inc.percentage,
            final_amount: inc.final_amount,
        },
        None => IncreaseTerms {
            months: 0,
            percentage: 0.0,
            final_amount: result.monthly_pension,
        },
    }
}

fn is_annuity_name(name: &str) -> bool {
    name.contains("Inmediata") || name.contains("RV") || name.contains("Renta Vitalicia")
}

/// Annuities land in a bucket by shape alone.
fn place_annuity<'a>(buckets: &mut Buckets<'a>, index: usize, result: &'a ScenarioResult) {
    match result.shape() {
        ScenarioShape::Immediate => {
            fill_slot(&mut buckets.immediate, &mut buckets.skipped, index, result)
        }
        ScenarioShape::Guaranteed { months } => buckets
            .guaranteed
            .push(SectionKind::GuaranteedAnnuity { result, months }),
        shape @ (ScenarioShape::Increased(_) | ScenarioShape::GuaranteedAndIncreased { .. }) => {
            buckets.increased.push(SectionKind::IncreasedAnnuity {
                result,
                increase: increase_terms(result),
                guaranteed_months: shape.guaranteed_months(),
            })
        }
    }
}

/// Name matching for results without a kind. A drawdown-named result that
/// also carries a guarantee or an increase fills the drawdown slot and its
/// annuity bucket.
fn place_old_age_by_name<'a>(
    buckets: &mut Buckets<'a>,
    index: usize,
    result: &'a ScenarioResult,
) {
    let drawdown = result.name.contains("Retiro Programado");
    if drawdown {
        fill_slot(&mut buckets.drawdown, &mut buckets.skipped, index, result);
    }
    match result.shape() {
        ScenarioShape::Immediate if drawdown => {}
        ScenarioShape::Immediate if !is_annuity_name(&result.name) => {
            skip(&mut buckets.skipped, index, result, SkipReason::Unmatched)
        }
        _ => place_annuity(buckets, index, result),
    }
}

/// Old-age annuities are bucketed by shape; the kind only says "annuity".
fn classify_old_age(results: &[ScenarioResult]) -> Classification<'_> {
    let mut buckets = Buckets::default();
    for (index, result) in results.iter().enumerate() {
        match result.kind {
            Some(ScenarioKind::Drawdown) => {
                fill_slot(&mut buckets.drawdown, &mut buckets.skipped, index, result)
            }
            Some(
                ScenarioKind::ImmediateAnnuity
                | ScenarioKind::GuaranteedAnnuity
                | ScenarioKind::IncreasedAnnuity,
            ) => place_annuity(&mut buckets, index, result),
            Some(ScenarioKind::DisabilityPension | ScenarioKind::Survivor) => {
                skip(&mut buckets.skipped, index, result, SkipReason::WrongPensionType)
            }
            None => place_old_age_by_name(&mut buckets, index, result),
        }
    }
    buckets.into_classification()
}

fn infer_disability(result: &ScenarioResult) -> Option<ScenarioKind> {
    let name = result.name.as_str();
    if name.contains("Retiro Programado") {
        Some(ScenarioKind::Drawdown)
    } else if name.contains("RV Inmediata") && name.contains("Invalidez") {
        Some(ScenarioKind::ImmediateAnnuity)
    } else if name.contains("RV Invalidez +") && name.contains('x') {
        Some(ScenarioKind::IncreasedAnnuity)
    } else if name.contains("RV Invalidez Garantia") {
        Some(ScenarioKind::GuaranteedAnnuity)
    } else if name.contains("Pension Invalidez") {
        Some(ScenarioKind::DisabilityPension)
    } else {
        None
    }
}

fn classify_disability(results: &[ScenarioResult]) -> Classification<'_> {
    let mut buckets = Buckets::default();
    for (index, result) in results.iter().enumerate() {
        match result.kind.or_else(|| infer_disability(result)) {
            Some(ScenarioKind::Drawdown) => {
                fill_slot(&mut buckets.drawdown, &mut buckets.skipped, index, result)
            }
            Some(ScenarioKind::ImmediateAnnuity) => {
                fill_slot(&mut buckets.immediate, &mut buckets.skipped, index, result)
            }
            Some(ScenarioKind::GuaranteedAnnuity) => {
                buckets.guaranteed.push(SectionKind::GuaranteedAnnuity {
                    result,
                    months: result.guaranteed_months.unwrap_or(0),
                })
            }
            Some(ScenarioKind::IncreasedAnnuity) => {
                buckets.increased.push(SectionKind::IncreasedAnnuity {
                    result,
                    increase: increase_terms(result),
                    guaranteed_months: result.shape().guaranteed_months(),
                })
            }
            Some(ScenarioKind::DisabilityPension) if results.len() == 1 => {
                fill_slot(&mut buckets.disability, &mut buckets.skipped, index, result)
            }
            Some(ScenarioKind::DisabilityPension) => {
                skip(&mut buckets.skipped, index, result, SkipReason::NotSoleResult)
            }
            Some(ScenarioKind::Survivor) => {
                skip(&mut buckets.skipped, index, result, SkipReason::WrongPensionType)
            }
            None => skip(&mut buckets.skipped, index, result, SkipReason::Unmatched),
        }
    }
    buckets.into_classification()
}

/// First result describing a bare disability pension, whether or not it ends
/// up with a section of its own. Its grade and base income complete the
/// affiliate's when those are missing.
pub fn disability_result(results: &[ScenarioResult]) -> Option<&ScenarioResult> {
    results.iter().find(|r| {
        r.kind.or_else(|| infer_disability(r)) == Some(ScenarioKind::DisabilityPension)
    })
}
