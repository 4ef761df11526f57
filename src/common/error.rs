// src/common/error.rs

use thiserror::Error;

// The application error type. Note the deliberate lack of HTTP status
// classification: the backend is trusted blindly, a 401 surfaces exactly
// like a 500 (the `Request` variant), and nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("request to the backend failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed response from the backend: {0}")]
    MalformedResponse(String),

    #[error("not logged in; run `rm-admin login` first")]
    NotLoggedIn,

    // Product form errors carry the field they belong to so the handler can
    // print them next to the right input.
    #[error("{field}: {message}")]
    FormValidation {
        field: &'static str,
        message: &'static str,
    },

    #[error("no data available for export")]
    EmptyExport,

    #[error("font not found: {0}")]
    FontNotFound(String),

    #[error("document rendering failed: {0}")]
    DocumentRender(String),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    // Session slot reads/writes
    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic variant for anything unexpected
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
