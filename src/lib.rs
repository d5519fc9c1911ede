pub mod classify;
pub mod compose;
pub mod config;
mod error;
pub mod figures;
mod fonts;
pub mod format;
pub mod labels;
pub mod model;
pub mod pdf;
pub mod request;
pub mod surface;
pub mod validate;

pub use compose::{Composition, compose, report_filename};
pub use config::ReportConfig;
pub use error::{Error, ValidationError};
pub use model::ReportRequest;
pub use pdf::PdfSurface;
pub use request::{ErrorPayload, Response, handle_request};

use std::path::Path;
use std::time::Instant;

use surface::Surface;

/// A finished study.
#[derive(Debug)]
pub struct Report {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub pages: usize,
    pub warnings: Vec<String>,
}

pub fn parse_request(body: &[u8]) -> Result<ReportRequest, Error> {
    Ok(serde_json::from_slice(body)?)
}

pub fn render_report(request: &ReportRequest, config: &ReportConfig) -> Result<Report, Error> {
    let t0 = Instant::now();

    validate::validate(request)?;

    let mut surface = PdfSurface::with_fonts(config.fonts.clone());
    let composition = compose(request, config, &mut surface)?;
    let t_layout = t0.elapsed();

    let bytes = surface.save()?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, serialize={:.1}ms, total={:.1}ms (output {} bytes, {} pages, {} sections)",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
        composition.pages,
        composition.sections,
    );

    Ok(Report {
        filename: report_filename(&request.affiliate),
        bytes,
        pages: composition.pages,
        warnings: composition.warnings,
    })
}

pub fn render_report_json(body: &[u8], config: &ReportConfig) -> Result<Report, Error> {
    let t0 = Instant::now();
    let request = parse_request(body)?;
    log::debug!(
        "Parsed request: {} results in {:.1}ms",
        request.results.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );
    render_report(&request, config)
}

/// Render a request file and write the PDF to `output`.
pub fn render_report_file(
    input: &Path,
    output: &Path,
    config: &ReportConfig,
) -> Result<Report, Error> {
    let body = std::fs::read(input).map_err(Error::Io)?;
    let report = render_report_json(&body, config)?;
    std::fs::write(output, &report.bytes).map_err(Error::Io)?;
    Ok(report)
}
