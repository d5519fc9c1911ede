//! Rendering parameters that encode regulatory values and page geometry.
//!
//! Everything here has a default matching the published study layout; a JSON
//! file passed to [`ReportConfig::from_path`] only needs the keys it changes.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::compose::table::TableStyle;
use crate::error::Error;
use crate::format::NumberFormat;
use crate::surface::FontWeight;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub page: PageGeometry,
    pub deductions: Deductions,
    /// Flat government supplement (PGU) added to annuity liquid amounts, in pesos.
    pub supplement_amount: f64,
    /// Administrator named next to the drawdown fee.
    pub drawdown_provider: String,
    pub thresholds: Thresholds,
    pub table: TableStyle,
    pub number_format: NumberFormat,
    pub fonts: FontSources,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::default(),
            deductions: Deductions::default(),
            supplement_amount: 224_004.0,
            drawdown_provider: "AFP HABITAT".to_string(),
            thresholds: Thresholds::default(),
            table: TableStyle::default(),
            number_format: NumberFormat::default(),
            fonts: FontSources::default(),
        }
    }
}

impl ReportConfig {
    /// Defaults with font overrides taken from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.fonts.apply_env();
        config
    }

    /// Load a JSON config file; missing keys keep their defaults and the
    /// environment font overrides still apply.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", e, path.display()),
            ))
        })?;
        let mut config: Self = serde_json::from_str(&text)?;
        config.fonts.apply_env();
        Ok(config)
    }
}

/// Page size and cursor origin, in PDF points (US Letter by default).
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Cursor position of the first line on every page.
    pub top: f32,
    pub margin_left: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            top: 750.0,
            margin_left: 50.0,
        }
    }
}

/// Deduction rates applied to the gross monthly pension, as fractions.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Deductions {
    /// Administrator fee charged on drawdown pensions only.
    pub drawdown_fee_rate: f64,
    /// Health contribution charged on every scenario.
    pub health_rate: f64,
}

impl Default for Deductions {
    fn default() -> Self {
        Self {
            drawdown_fee_rate: 0.0095,
            health_rate: 0.07,
        }
    }
}

/// Minimum remaining cursor height before a block is drawn; below it the
/// block starts on a new page.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub single_table: f32,
    pub dual_table: f32,
    /// Bullet lists (beneficiaries, advisories) stop below this cursor.
    pub list_floor: f32,
    /// Closing notes are drawn no higher than this cursor.
    pub notes_floor: f32,
    /// Lowest cursor a note line may be drawn at.
    pub bottom_margin: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            single_table: 150.0,
            dual_table: 220.0,
            list_floor: 100.0,
            notes_floor: 100.0,
            bottom_margin: 20.0,
        }
    }
}

/// Optional TrueType files replacing the built-in Helvetica faces.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FontSources {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
}

impl FontSources {
    pub const REGULAR_ENV: &'static str = "PENSION_REPORT_FONT_REGULAR";
    pub const BOLD_ENV: &'static str = "PENSION_REPORT_FONT_BOLD";

    pub fn path(&self, weight: FontWeight) -> Option<&Path> {
        match weight {
            FontWeight::Regular => self.regular.as_deref(),
            FontWeight::Bold => self.bold.as_deref(),
        }
    }

    fn apply_env(&mut self) {
        if let Some(path) = env_path(Self::REGULAR_ENV) {
            self.regular = Some(path);
        }
        if let Some(path) = env_path(Self::BOLD_ENV) {
            self.bold = Some(path);
        }
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    let val = std::env::var(var).ok()?;
    let trimmed = val.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
