use thiserror::Error;

/// Error taxonomy for the widget core. Nothing here is fatal: fetch and
/// submission errors are surfaced and leave the wizard in a recoverable
/// interactive state, validation errors block a transition without issuing a
/// network call, and malformed availability records are skipped per-record
/// inside the resolver rather than reported through this type.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} {message}")]
    Api { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Incomplete booking draft: {0}")]
    InvalidDraft(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
