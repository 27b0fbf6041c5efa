use thiserror::Error;

/// Errors raised when reading pushdown settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The target version string has no numeric major component.
    #[error("Invalid target version: {0}")]
    InvalidVersion(String),

    /// The pre-filter query is not a JSON query document.
    #[error("Invalid pre-filter query: {0}")]
    InvalidQuery(String),

    /// URI search queries (`?q=...`) cannot be turned into a filter document.
    #[error("URI search queries are not supported as pre-filters: {0}")]
    UriQuery(String),

    /// Malformed JSON in a settings file or query.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// One or more settings failed validation.
    #[error("Settings validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),
}
