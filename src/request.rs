//! Transport-neutral request handling: JSON body in, PDF or error payload out.

use serde::Serialize;

use crate::config::ReportConfig;
use crate::error::Error;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Body returned with a failed request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub success: bool,
    pub error: String,
}

impl ErrorPayload {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            error: format!("Error al generar el reporte PDF: {err}"),
        }
    }
}

#[derive(Debug)]
pub enum Response {
    Document {
        filename: String,
        bytes: Vec<u8>,
        warnings: Vec<String>,
    },
    Failure {
        status: u16,
        payload: ErrorPayload,
    },
}

impl Response {
    pub fn status(&self) -> u16 {
        match self {
            Response::Document { .. } => 200,
            Response::Failure { status, .. } => *status,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Response::Document { .. } => PDF_CONTENT_TYPE,
            Response::Failure { .. } => JSON_CONTENT_TYPE,
        }
    }

    /// `attachment; filename="…"` for documents.
    pub fn content_disposition(&self) -> Option<String> {
        match self {
            Response::Document { filename, .. } => {
                Some(format!("attachment; filename=\"{filename}\""))
            }
            Response::Failure { .. } => None,
        }
    }

    /// Response body: the PDF bytes or the serialized error payload.
    pub fn body(&self) -> Result<Vec<u8>, Error> {
        match self {
            Response::Document { bytes, .. } => Ok(bytes.clone()),
            Response::Failure { payload, .. } => Ok(serde_json::to_vec(payload)?),
        }
    }
}

/// Render one request body. Payload and validation problems answer 400,
/// anything failing during rendering answers 500.
pub fn handle_request(body: &[u8], config: &ReportConfig) -> Response {
    match crate::render_report_json(body, config) {
        Ok(report) => Response::Document {
            filename: report.filename,
            bytes: report.bytes,
            warnings: report.warnings,
        },
        Err(err) => {
            log::error!("Error generando reporte: {err}");
            let status = if err.is_client_error() { 400 } else { 500 };
            Response::Failure {
                status,
                payload: ErrorPayload::from_error(&err),
            }
        }
    }
}
