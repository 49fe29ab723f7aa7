use shipboard_common::{FilterError, SettingsError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShipboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Required settings are not set: {}. Set them in the environment or in the config file", .0.join(", "))]
    MissingSettings(Vec<String>),

    #[error("Could not acquire access token: {0}")]
    Auth(String),

    #[error("{0}")]
    Download(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read workbook: {0}")]
    Parse(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<calamine::XlsxError> for ShipboardError {
    fn from(err: calamine::XlsxError) -> Self {
        ShipboardError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShipboardError>;
