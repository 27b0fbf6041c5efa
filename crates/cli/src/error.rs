use engine_config::settings::error::SettingsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to deserialize the predicate as JSON: {0}")]
    PredicateDeserialize(#[from] serde_json::Error),

    #[error("Invalid pushdown settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),
}
