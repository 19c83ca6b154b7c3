use thiserror::Error;

/// Failures surfaced to callers of the ledger and recipe pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Non-numeric or non-positive weight, malformed date key, bad metrics input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No usable ingredients survived extraction.
    #[error("no ingredients to search with")]
    EmptyIngredients,

    /// OCR or recipe service failure, including non-2xx responses.
    #[error("{service} failed: {message}")]
    ExternalService { service: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    /// Persistence collaborator failure.
    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    pub fn external(service: &str, message: impl Into<String>) -> Self {
        Error::ExternalService {
            service: service.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
