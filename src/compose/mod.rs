//! Lays a validated request out onto a [`Surface`], top to bottom.
//!
//! The composer owns the [`Pager`] for one build. Every block asks the pager
//! for room first, draws at the cursor, then moves the cursor below itself.

pub mod layout;
pub mod table;

use crate::classify::{self, IncreaseTerms, Section, SectionKind};
use crate::config::ReportConfig;
use crate::error::Error;
use crate::figures::{self, Figures, IncreaseDelta};
use crate::format::{
    NumberFormat, fixed, increase_percent, period_text, rate_percent, trimmed_percent,
    whole_percent,
};
use crate::labels::{beneficiary_label, disability_grade_label, pension_type_label};
use crate::model::{Affiliate, BeneficiaryShare, PensionType, ReportRequest, ScenarioResult};
use crate::surface::{FontWeight, Fonts, RectStyle, Rgb, Surface, TextStyle};

use layout::Pager;
use table::{Table, draw_table};

const TITLE_COLOR: Rgb = Rgb(0.102, 0.212, 0.365);
const NAME_COLOR: Rgb = Rgb(0.176, 0.216, 0.282);
const HEADING_COLOR: Rgb = Rgb(0.122, 0.306, 0.475);
const DURING_COLOR: Rgb = Rgb(0.2, 0.5, 0.2);
const AFTER_COLOR: Rgb = Rgb(0.6, 0.2, 0.2);
const DURING_SUPPLEMENT_COLOR: Rgb = Rgb(0.2, 0.4, 0.6);
const AFTER_SUPPLEMENT_COLOR: Rgb = Rgb(0.4, 0.2, 0.4);
const GUARANTEE_NOTE_COLOR: Rgb = Rgb::gray(0.3);
const ADVISORY_COLOR: Rgb = Rgb::gray(0.4);
const DELTA_COLOR: Rgb = Rgb::gray(0.5);
const RULE_COLOR: Rgb = Rgb::gray(0.7);

const TITLE_X: f32 = 150.0;
const NAME_X: f32 = 220.0;
const INDENT: f32 = 10.0;
const RULE_WIDTH: f32 = 500.0;
const NAME_CELL_CHARS: usize = 25;
const NOTE_LEADING: f32 = 12.0;

const DRAWDOWN_WIDTHS: [f32; 6] = [110.0, 70.0, 90.0, 70.0, 80.0, 85.0];
const OLD_AGE_ANNUITY_WIDTHS: [f32; 6] = [120.0, 55.0, 70.0, 85.0, 75.0, 85.0];
const INCREASE_WIDTHS: [f32; 4] = [80.0, 120.0, 100.0, 100.0];
const DISABILITY_ANNUITY_WIDTHS: [f32; 5] = [130.0, 80.0, 100.0, 90.0, 100.0];
const DISABILITY_INCREASE_WIDTHS: [f32; 5] = [140.0, 70.0, 100.0, 90.0, 100.0];
const DISABILITY_PENSION_WIDTHS: [f32; 5] = [100.0, 80.0, 100.0, 90.0, 100.0];
const SURVIVOR_WIDTHS: [f32; 5] = [130.0, 70.0, 100.0, 90.0, 90.0];
const DISTRIBUTION_WIDTHS: [f32; 3] = [120.0, 80.0, 120.0];

const NOTES: [&str; 3] = [
    "NOTA: VALORES ESTIMATIVOS NO CONSTITUYEN UNA OFERTA FORMAL DE PENSION.",
    "LA PGU SE SOLICITA A LOS 65 ANOS, REQUISITO TENER REGISTRO SOCIAL DE HOGARES.",
    "BONIFICACION POR ANO COTIZADO: 0.1 UF POR ANO COTIZADO.",
];
const DISABILITY_NOTE: &str = "PENSION DE INVALIDEZ: REQUIERE DICTAMEN DE COMISION MEDICA.";
const SURVIVOR_NOTE: &str = "PENSION DE SOBREVIVENCIA: PORCENTAJES SEGUN ART. 58 DL 3500.";

/// Outcome of one layout pass.
#[derive(Clone, Debug, Default)]
pub struct Composition {
    pub pages: usize,
    pub sections: usize,
    /// Skipped results and truncated or degraded blocks, in drawing order.
    pub warnings: Vec<String>,
}

pub fn title(pension_type: PensionType) -> &'static str {
    match pension_type {
        PensionType::Vejez => "ESTUDIO PRELIMINAR DE PENSION",
        PensionType::Invalidez => "ESTUDIO PRELIMINAR DE PENSION DE INVALIDEZ",
        PensionType::Sobrevivencia => "ESTUDIO PRELIMINAR DE PENSION DE SOBREVIVENCIA",
    }
}

fn salutation(pension_type: PensionType) -> &'static str {
    match pension_type {
        PensionType::Sobrevivencia => "CAUSANTE",
        PensionType::Vejez | PensionType::Invalidez => "SR.",
    }
}

/// `Estudio_invalidez_JUAN_PEREZ.pdf`; old-age studies carry no type suffix.
/// Only `A-Z` letters survive in the name, whitespace runs become `_`.
pub fn report_filename(affiliate: &Affiliate) -> String {
    let display = affiliate.display_name();
    let cleaned: String = display
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_whitespace())
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let name = if words.is_empty() {
        "AFILIADO".to_string()
    } else {
        words.join("_")
    };
    match affiliate.pension_type {
        PensionType::Vejez => format!("Estudio_{name}.pdf"),
        other => format!("Estudio_{}_{name}.pdf", other.as_str()),
    }
}

/// Lay out the whole report. `request` must already have passed
/// [`validate`](crate::validate::validate).
pub fn compose<S: Surface>(
    request: &ReportRequest,
    config: &ReportConfig,
    surface: &mut S,
) -> Result<Composition, Error> {
    let fonts = Fonts::embed(surface)?;
    let pager = Pager::start(surface, config.page);
    let pension_type = request.affiliate.pension_type;

    let mut composer = Composer {
        surface,
        pager,
        fonts,
        config,
        numbers: config.number_format,
        warnings: Vec::new(),
    };

    composer.header(request)?;

    let classification = classify::classify(&request.results, pension_type);
    composer
        .warnings
        .extend(classification.skipped.iter().map(ToString::to_string));

    match pension_type {
        PensionType::Vejez => {}
        PensionType::Invalidez => composer.disability_grade(request)?,
        PensionType::Sobrevivencia => composer.beneficiary_list(request)?,
    }

    for section in &classification.sections {
        log::debug!(
            "SECTION #{} {} \"{}\" y={:.2}",
            section.number,
            section.kind.as_str(),
            section.kind.result().name,
            composer.pager.y()
        );
        composer.section(section, pension_type, request.parameters.uf)?;
    }

    composer.notes(pension_type)?;

    Ok(Composition {
        pages: composer.pager.pages(),
        sections: classification.sections.len(),
        warnings: composer.warnings,
    })
}

struct Composer<'a, S: Surface> {
    surface: &'a mut S,
    pager: Pager,
    fonts: Fonts,
    config: &'a ReportConfig,
    numbers: NumberFormat,
    warnings: Vec<String>,
}

impl<S: Surface> Composer<'_, S> {
    fn margin(&self) -> f32 {
        self.pager.geometry().margin_left
    }

    fn text_at(
        &mut self,
        x: f32,
        text: &str,
        size: f32,
        weight: FontWeight,
        color: Rgb,
    ) -> Result<(), Error> {
        let style = TextStyle {
            x,
            y: self.pager.y(),
            size,
            font: self.fonts.get(weight),
            color,
        };
        self.surface.draw_text(self.pager.page(), text, style)
    }

    /// Body text at the left margin.
    fn text(&mut self, text: &str, size: f32, weight: FontWeight, color: Rgb) -> Result<(), Error> {
        let x = self.margin();
        self.text_at(x, text, size, weight, color)
    }

    fn heading(&mut self, number: usize, title: &str) -> Result<(), Error> {
        self.text(&format!("{number}. {title}"), 11.0, FontWeight::Bold, HEADING_COLOR)
    }

    fn subtitle(&mut self, text: &str) -> Result<(), Error> {
        self.text(text, 9.0, FontWeight::Regular, Rgb::BLACK)
    }

    fn table_at(&mut self, x: f32, table: &Table) -> Result<(), Error> {
        let y = draw_table(
            &mut *self.surface,
            self.pager.page(),
            table,
            x,
            self.pager.y(),
            &self.config.table,
            &self.fonts,
        )?;
        self.pager.advance_to(y)
    }

    fn table(&mut self, table: &Table) -> Result<(), Error> {
        let x = self.margin();
        self.table_at(x, table)
    }

    fn ensure_space(&mut self, min_remaining: f32) {
        self.pager.ensure_space(&mut *self.surface, min_remaining);
    }

    fn warn(&mut self, message: String) {
        log::warn!("{message}");
        self.warnings.push(message);
    }

    fn currency(&self, n: f64) -> String {
        self.numbers.currency(n)
    }

    fn deduction(&self, n: f64) -> String {
        self.numbers.deduction(n)
    }

    fn uf_cell(value: f64) -> String {
        format!("{} UF", fixed(value, 2))
    }

    fn fee_header(&self) -> String {
        let rate = self.config.deductions.drawdown_fee_rate * 100.0;
        format!("Desc. {}%", trimmed_percent(rate))
    }

    fn health_header(&self) -> String {
        let rate = self.config.deductions.health_rate * 100.0;
        format!("Dscto. {}% Salud", trimmed_percent(rate))
    }

    fn supplement_label(&self) -> String {
        format!("Pension + PGU ({})", self.currency(self.config.supplement_amount))
    }

    fn supplement_line(&self, figures: &Figures) -> String {
        format!(
            "Con PGU (+{}): {}/mes",
            self.currency(self.config.supplement_amount),
            self.currency(figures.with_supplement.unwrap_or(figures.liquid))
        )
    }

    fn annuity_figures(&self, gross: f64) -> Figures {
        Figures::annuity(gross, &self.config.deductions, self.config.supplement_amount)
    }

    /// `Modalidad | Pension (UF) | Bruto | Salud | Liquida`, the five-column
    /// layout shared by the invalidez and sobrevivencia tables.
    fn five_column(&self, first: &str, widths: &[f32]) -> Table {
        Table::new(
            widths,
            [
                first.to_string(),
                "Pension (UF)".to_string(),
                "Pension M. Bruto".to_string(),
                self.health_header(),
                "Pension Liquida".to_string(),
            ],
        )
    }

    fn five_column_row(&self, label: &str, uf: f64, figures: &Figures) -> [String; 5] {
        [
            label.to_string(),
            Self::uf_cell(uf),
            self.currency(figures.gross),
            self.deduction(figures.health),
            self.currency(figures.liquid),
        ]
    }

    fn header(&mut self, request: &ReportRequest) -> Result<(), Error> {
        let affiliate = &request.affiliate;
        let pension_type = affiliate.pension_type;

        self.text_at(TITLE_X, title(pension_type), 16.0, FontWeight::Bold, TITLE_COLOR)?;
        self.pager.advance(25.0);

        let name = format!("{} {}", salutation(pension_type), affiliate.display_name());
        self.text_at(NAME_X, &name, 14.0, FontWeight::Bold, NAME_COLOR)?;
        self.pager.advance(25.0);

        let uf = request.parameters.uf;
        let funds_uf = (affiliate.accumulated_funds / uf).round();
        let lines = [
            format!("Valor UF Utilizado: {}", self.currency(uf)),
            format!("Edad: {} anos", affiliate.age),
            format!("Tipo de Pension: {}", pension_type_label(pension_type)),
            format!("Saldo Acumulado (Bruto): {} UF", self.numbers.integer(funds_uf)),
        ];
        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            self.text(line, 10.0, FontWeight::Regular, Rgb::BLACK)?;
            self.pager.advance(if i == last { 20.0 } else { 15.0 });
        }
        Ok(())
    }

    fn disability_grade(&mut self, request: &ReportRequest) -> Result<(), Error> {
        let source = classify::disability_result(&request.results);
        let affiliate = &request.affiliate;
        let Some(grade) = affiliate
            .disability_grade
            .as_deref()
            .or_else(|| source.and_then(|r| r.disability_grade.as_deref()))
        else {
            return Ok(());
        };
        let income = affiliate
            .base_income
            .or_else(|| source.and_then(|r| r.base_income))
            .unwrap_or(0.0);

        let grade_line = format!("Grado de Invalidez: {}", disability_grade_label(grade));
        self.text(&grade_line, 10.0, FontWeight::Bold, Rgb::BLACK)?;
        self.pager.advance(15.0);
        let income_line = format!("Ingreso Base de Referencia: {}", self.currency(income));
        self.text(&income_line, 10.0, FontWeight::Regular, Rgb::BLACK)?;
        self.pager.advance(25.0);
        Ok(())
    }

    fn beneficiary_list(&mut self, request: &ReportRequest) -> Result<(), Error> {
        let beneficiaries = &request.beneficiaries;
        if beneficiaries.is_empty() {
            return Ok(());
        }
        self.text("Beneficiarios:", 10.0, FontWeight::Bold, Rgb::BLACK)?;
        self.pager.advance(15.0);

        let floor = self.config.thresholds.list_floor;
        let x = self.margin() + INDENT;
        for (shown, ben) in beneficiaries.iter().enumerate() {
            if self.pager.y() < floor {
                self.warn(format!(
                    "beneficiary list truncated: {} of {} shown",
                    shown,
                    beneficiaries.len()
                ));
                break;
            }
            let line = format!(
                "- {}: {} anos, {} de pension",
                beneficiary_label(&ben.kind),
                ben.age,
                whole_percent(ben.pension_share)
            );
            self.text_at(x, &line, 9.0, FontWeight::Regular, Rgb::BLACK)?;
            self.pager.advance(12.0);
        }
        self.pager.advance(10.0);
        Ok(())
    }

    fn section(
        &mut self,
        section: &Section<'_>,
        pension_type: PensionType,
        uf: f64,
    ) -> Result<(), Error> {
        let number = section.number;
        match (section.kind, pension_type) {
            (SectionKind::Survivor(result), _) => self.survivor(number, result),
            (SectionKind::DisabilityPension(result), _) => {
                self.disability_pension(number, result)
            }
            (SectionKind::Drawdown(result), _) => self.drawdown(number, result, pension_type),
            (SectionKind::ImmediateAnnuity(result), PensionType::Invalidez) => {
                self.disability_immediate(number, result)
            }
            (SectionKind::ImmediateAnnuity(result), _) => self.old_age_immediate(number, result),
            (SectionKind::GuaranteedAnnuity { result, months }, PensionType::Invalidez) => {
                self.disability_guaranteed(number, result, months)
            }
            (SectionKind::GuaranteedAnnuity { result, months }, _) => {
                self.old_age_guaranteed(number, result, months)
            }
            (SectionKind::IncreasedAnnuity { result, increase, .. }, PensionType::Invalidez) => {
                self.disability_increased(number, result, increase, uf)
            }
            (
                SectionKind::IncreasedAnnuity {
                    result,
                    increase,
                    guaranteed_months,
                },
                _,
            ) => self.old_age_increased(number, result, increase, guaranteed_months, uf),
        }
    }

    fn drawdown(
        &mut self,
        number: usize,
        result: &ScenarioResult,
        pension_type: PensionType,
    ) -> Result<(), Error> {
        self.ensure_space(self.config.thresholds.single_table);
        let disability = pension_type == PensionType::Invalidez;

        if disability {
            self.heading(number, "Retiro Programado (Invalidez)")?;
            self.pager.advance(15.0);
            self.subtitle("(Usa tabla de mortalidad de invalidos I-H/I-M-2020)")?;
        } else {
            self.heading(number, "Retiro Programado")?;
            self.pager.advance(15.0);
            let fee = trimmed_percent(self.config.deductions.drawdown_fee_rate * 100.0);
            let provider = format!("({} - {}%)", self.config.drawdown_provider, fee);
            self.subtitle(&provider)?;
        }
        self.pager.advance(20.0);

        let figures = Figures::drawdown(result.monthly_pension, &self.config.deductions);
        let label = if disability { "RP INVALIDEZ" } else { "RETIRO PROGRAMADO" };
        let table = Table::new(
            &DRAWDOWN_WIDTHS,
            [
                "Modalidad".to_string(),
                "Pension (UF)".to_string(),
                "Pension M. Bruto".to_string(),
                self.fee_header(),
                self.health_header(),
                "Pension Liquida".to_string(),
            ],
        )
        .row([
            label.to_string(),
            Self::uf_cell(result.pension_uf),
            self.currency(figures.gross),
            self.deduction(figures.drawdown_fee),
            self.deduction(figures.health),
            self.currency(figures.liquid),
        ]);
        self.table(&table)?;
        if !disability {
            self.pager.advance(10.0);
        }
        Ok(())
    }

    /// Six-column old-age annuity table with the supplement row underneath.
    fn old_age_annuity_table(&self, label: &str, result: &ScenarioResult) -> Table {
        let figures = self.annuity_figures(result.monthly_pension);
        let rate = format!("{}%", rate_percent(result.interest_rate));
        Table::new(
            &OLD_AGE_ANNUITY_WIDTHS,
            [
                "Modalidad".to_string(),
                "Tasa (%)".to_string(),
                "Pension (UF)".to_string(),
                "Pension M. Bruto".to_string(),
                self.health_header(),
                "Pension Liquida".to_string(),
            ],
        )
        .row([
            label.to_string(),
            rate,
            Self::uf_cell(result.pension_uf),
            self.currency(figures.gross),
            self.deduction(figures.health),
            self.currency(figures.liquid),
        ])
        .row([
            self.supplement_label(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            self.currency(figures.with_supplement.unwrap_or(figures.liquid)),
        ])
    }

    fn old_age_immediate(
        &mut self,
        number: usize,
        result: &ScenarioResult,
    ) -> Result<(), Error> {
        self.ensure_space(self.config.thresholds.single_table);
        self.heading(number, "Renta Vitalicia Inmediata (Simple)")?;
        self.pager.advance(15.0);
        let rate = rate_percent(result.interest_rate);
        self.subtitle(&format!(
            "Calculo RVI: Tasa de Venta: Media Mercado (Vejez: {rate}%)"
        ))?;
        self.pager.advance(20.0);

        let table = self.old_age_annuity_table("RVI SIMPLE (Media Mercado)", result);
        self.table(&table)?;
        self.pager.advance(10.0);
        Ok(())
    }

    fn old_age_guaranteed(
        &mut self,
        number: usize,
        result: &ScenarioResult,
        months: u32,
    ) -> Result<(), Error> {
        self.ensure_space(self.config.thresholds.single_table);
        let period = period_text(months);
        self.heading(number, &format!("RV con Garantia {period} ({months} meses)"))?;
        self.pager.advance(15.0);
        self.subtitle("Si fallece antes del periodo, beneficiarios reciben el 100% de la pension")?;
        self.pager.advance(20.0);

        let table = self.old_age_annuity_table(&format!("RV GARANTIZADA {period}"), result);
        self.table(&table)?;
        self.pager.advance(10.0);
        Ok(())
    }

    fn increase_table(&self, uf_amount: f64, figures: &Figures) -> Table {
        Table::new(
            &INCREASE_WIDTHS,
            [
                "Pension (UF)".to_string(),
                "Pension Mensual Bruto".to_string(),
                self.health_header(),
                "Pension Liquida".to_string(),
            ],
        )
        .row([
            Self::uf_cell(uf_amount),
            self.currency(figures.gross),
            self.deduction(figures.health),
            self.currency(figures.liquid),
        ])
    }

    /// Gross pension once the increase ends; a missing final amount means the
    /// pension does not drop.
    fn base_pension(result: &ScenarioResult, increase: &IncreaseTerms) -> f64 {
        if increase.final_amount > 0.0 {
            increase.final_amount
        } else {
            result.monthly_pension
        }
    }

    fn old_age_increased(
        &mut self,
        number: usize,
        result: &ScenarioResult,
        increase: IncreaseTerms,
        guaranteed_months: Option<u32>,
        uf: f64,
    ) -> Result<(), Error> {
        self.ensure_space(self.config.thresholds.dual_table);

        self.heading(number, "RV CON AUMENTO TEMPORAL")?;
        self.pager.advance(15.0);
        let guarantee = guaranteed_months
            .map(|m| format!(" + Garantia {} anos", m / 12))
            .unwrap_or_default();
        self.subtitle(&format!(
            "Aumento: {}% por {}{}",
            increase_percent(increase.percentage),
            period_text(increase.months),
            guarantee
        ))?;
        self.pager.advance(18.0);
        if let Some(months) = guaranteed_months {
            let note = format!(
                "Periodo garantizado: {} anos - Si fallece, beneficiarios reciben el 100%",
                months / 12
            );
            self.text(&note, 8.0, FontWeight::Regular, GUARANTEE_NOTE_COLOR)?;
            self.pager.advance(15.0);
        }

        let during = self.annuity_figures(result.monthly_pension);
        let base = Self::base_pension(result, &increase);
        let after = self.annuity_figures(base);
        let indent = self.margin() + INDENT;

        self.text(
            ">>> PENSION DURANTE EL PERIODO DE AUMENTO:",
            10.0,
            FontWeight::Bold,
            DURING_COLOR,
        )?;
        self.pager.advance(15.0);
        let table = self.increase_table(result.pension_uf, &during);
        self.table(&table)?;
        let line = self.supplement_line(&during);
        self.text_at(indent, &line, 9.0, FontWeight::Regular, DURING_SUPPLEMENT_COLOR)?;
        self.pager.advance(20.0);

        let rule = RectStyle {
            x: self.margin(),
            y: self.pager.y() + 5.0,
            width: RULE_WIDTH,
            height: 0.5,
            fill: Some(RULE_COLOR),
            border: None,
        };
        self.surface.draw_rect(self.pager.page(), rule)?;
        self.pager.advance(15.0);

        self.text(
            ">>> PENSION DESPUES DEL PERIODO DE AUMENTO:",
            10.0,
            FontWeight::Bold,
            AFTER_COLOR,
        )?;
        self.pager.advance(15.0);
        let table = self.increase_table(figures::to_uf(base, uf), &after);
        self.table(&table)?;
        let line = self.supplement_line(&after);
        self.text_at(indent, &line, 9.0, FontWeight::Regular, AFTER_SUPPLEMENT_COLOR)?;
        self.pager.advance(20.0);

        let delta = IncreaseDelta::between(&during, &after);
        let difference = self.currency(delta.difference);
        let line = match delta.percent {
            Some(percent) => format!(
                "Diferencia: {difference}/menos ({}% menos despues del aumento)",
                fixed(percent, 1)
            ),
            None => {
                self.warn(format!(
                    "section {number} \"{}\": post-increase liquid pension is zero, \
                     percentage omitted",
                    result.name
                ));
                format!("Diferencia: {difference}/menos")
            }
        };
        self.text(&line, 8.0, FontWeight::Regular, DELTA_COLOR)?;
        self.pager.advance(15.0);
        Ok(())
    }

    fn disability_immediate(
        &mut self,
        number: usize,
        result: &ScenarioResult,
    ) -> Result<(), Error> {
        self.ensure_space(self.config.thresholds.single_table);
        self.heading(number, "Renta Vitalicia Inmediata (Invalidez)")?;
        self.pager.advance(15.0);
        let rate = rate_percent(result.interest_rate);
        self.subtitle(&format!("Tasa: {rate}% - Tabla de invalidos"))?;
        self.pager.advance(20.0);

        let figures = self.annuity_figures(result.monthly_pension);
        let row = self.five_column_row("RV INMEDIATA INVALIDEZ", result.pension_uf, &figures);
        let table = self.five_column("Modalidad", &DISABILITY_ANNUITY_WIDTHS).row(row);
        self.table(&table)
    }

    fn disability_guaranteed(
        &mut self,
        number: usize,
        result: &ScenarioResult,
        months: u32,
    ) -> Result<(), Error> {
        self.ensure_space(self.config.thresholds.single_table);
        let years = months / 12;
        self.heading(number, &format!("RV Invalidez con Garantia {years} anos"))?;
        self.pager.advance(20.0);

        let figures = self.annuity_figures(result.monthly_pension);
        let label = format!("RV GARANTIA {years} ANOS");
        let row = self.five_column_row(&label, result.pension_uf, &figures);
        let table = self.five_column("Modalidad", &DISABILITY_ANNUITY_WIDTHS).row(row);
        self.table(&table)
    }

    fn disability_increased(
        &mut self,
        number: usize,
        result: &ScenarioResult,
        increase: IncreaseTerms,
        uf: f64,
    ) -> Result<(), Error> {
        let thresholds = self.config.thresholds;
        self.ensure_space(thresholds.single_table + self.config.table.row_height);
        self.heading(number, "RV Invalidez con Aumento Temporal")?;
        self.pager.advance(15.0);
        self.subtitle(&format!(
            "Aumento {}% por {} anos",
            increase_percent(increase.percentage),
            increase.months / 12
        ))?;
        self.pager.advance(20.0);

        let during = self.annuity_figures(result.monthly_pension);
        let base = Self::base_pension(result, &increase);
        let after = self.annuity_figures(base);
        let months = increase.months;
        let during_row = self.five_column_row(
            &format!("RV AUMENTADA {months} MESES"),
            result.pension_uf,
            &during,
        );
        let after_row = self.five_column_row(
            &format!("PENSION BASE (desde mes {})", months + 1),
            figures::to_uf(base, uf),
            &after,
        );
        let table = self
            .five_column("Modalidad", &DISABILITY_INCREASE_WIDTHS)
            .row(during_row)
            .row(after_row);
        self.table(&table)
    }

    fn disability_pension(
        &mut self,
        number: usize,
        result: &ScenarioResult,
    ) -> Result<(), Error> {
        self.ensure_space(self.config.thresholds.single_table);
        self.heading(number, "Pension de Invalidez")?;
        self.pager.advance(15.0);
        let code = result.disability_grade.as_deref().unwrap_or("total");
        let grade = disability_grade_label(code);
        self.subtitle(&format!(
            "Grado: {grade} - Tasa: {}%",
            rate_percent(result.interest_rate)
        ))?;
        self.pager.advance(20.0);

        let figures = self.annuity_figures(result.monthly_pension);
        let row = self.five_column_row(grade, result.pension_uf, &figures);
        let table = self.five_column("Grado", &DISABILITY_PENSION_WIDTHS).row(row);
        self.table(&table)?;

        if result.warnings.is_empty() {
            return Ok(());
        }
        self.pager.advance(5.0);
        let floor = self.config.thresholds.list_floor;
        for (shown, advisory) in result.warnings.iter().enumerate() {
            if self.pager.y() < floor {
                self.warn(format!(
                    "section {number} advisories truncated: {} of {} shown",
                    shown,
                    result.warnings.len()
                ));
                break;
            }
            self.text(&format!("- {advisory}"), 8.0, FontWeight::Regular, ADVISORY_COLOR)?;
            self.pager.advance(12.0);
        }
        Ok(())
    }

    /// Rows, header included, that fit between the cursor and the bottom margin.
    fn rows_that_fit(&self) -> usize {
        let style = &self.config.table;
        let room = self.pager.y() - style.cell_drop - self.config.thresholds.bottom_margin;
        if room < 0.0 {
            0
        } else {
            (room / style.row_height) as usize + 1
        }
    }

    fn survivor(&mut self, number: usize, result: &ScenarioResult) -> Result<(), Error> {
        let shares = &result.beneficiary_shares;
        let nested = shares.len() as f32 * self.config.table.row_height;
        // a block taller than a page starts on a fresh one and splits below
        let top = self.pager.geometry().top;
        self.ensure_space((self.config.thresholds.single_table + nested).min(top));

        self.heading(number, &result.name)?;
        self.pager.advance(20.0);

        let figures = self.annuity_figures(result.monthly_pension);
        let label: String = result.name.chars().take(NAME_CELL_CHARS).collect();
        let row = self.five_column_row(&label, result.pension_uf, &figures);
        let table = self.five_column("Modalidad", &SURVIVOR_WIDTHS).row(row);
        self.table(&table)?;

        if shares.is_empty() {
            return Ok(());
        }
        self.pager.advance(5.0);
        self.text("Distribucion por Beneficiario:", 9.0, FontWeight::Bold, Rgb::BLACK)?;
        self.pager.advance(15.0);
        self.distribution(shares)
    }

    /// Nested share table. Rows that do not fit continue on the next page
    /// under a repeated header.
    fn distribution(&mut self, shares: &[BeneficiaryShare]) -> Result<(), Error> {
        let x = self.margin() + INDENT;
        let mut remaining = shares;
        while !remaining.is_empty() {
            let fit = self.rows_that_fit().saturating_sub(1);
            if fit == 0 {
                if self.pager.y() >= self.pager.geometry().top {
                    return Err(Error::Surface(
                        "page too short for a single table row".to_string(),
                    ));
                }
                self.pager.new_page(&mut *self.surface);
                continue;
            }
            let (chunk, rest) = remaining.split_at(fit.min(remaining.len()));
            let mut table = Table::new(
                &DISTRIBUTION_WIDTHS,
                ["Beneficiario", "Porcentaje", "Pension Mensual"],
            );
            for share in chunk {
                table = table.row([
                    beneficiary_label(&share.kind).to_string(),
                    whole_percent(share.share),
                    self.currency(share.monthly_pension),
                ]);
            }
            self.table_at(x, &table)?;
            remaining = rest;
            if !remaining.is_empty() {
                log::debug!(
                    "DISTRIBUTION split: {} rows continue on the next page",
                    remaining.len()
                );
                self.pager.new_page(&mut *self.surface);
            }
        }
        Ok(())
    }

    fn notes(&mut self, pension_type: PensionType) -> Result<(), Error> {
        let extra = match pension_type {
            PensionType::Vejez => None,
            PensionType::Invalidez => Some(DISABILITY_NOTE),
            PensionType::Sobrevivencia => Some(SURVIVOR_NOTE),
        };
        let lines: Vec<&str> = NOTES.iter().copied().chain(extra).collect();

        let thresholds = self.config.thresholds;
        let span = (lines.len() - 1) as f32 * NOTE_LEADING;
        self.ensure_space(thresholds.bottom_margin + span);
        self.pager.pin_to(thresholds.notes_floor);

        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.pager.advance(NOTE_LEADING);
            }
            self.text(line, 7.0, FontWeight::Regular, Rgb::BLACK)?;
        }
        Ok(())
    }
}
