use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from reading record files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse errors from the record source.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal or event-loop errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The record source exists but does not hold a usable record set.
    #[error("Invalid record source: {0}")]
    InvalidSource(String),
}
