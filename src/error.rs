use thiserror::Error;

/// A request that parsed but cannot be rendered.
///
/// `field` is a JSON-style path into the request (`resultados[2].pensionMensual`).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid request payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("font error: {0}")]
    Font(String),

    #[error("drawing surface error: {0}")]
    Surface(String),
}

impl Error {
    /// Errors caused by the caller's payload rather than by rendering.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Json(_) | Error::Validation(_))
    }
}
