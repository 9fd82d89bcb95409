use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("OAuth2 authentication error: {0}")]
    Auth(String),

    #[error("Google Sheets API error: {0}")]
    Sheets(String),

    #[error("Google Drive API error: {0}")]
    Drive(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("No active {0}")]
    NoSelection(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub(crate) fn no_spreadsheet(action: &str) -> Self {
        AppError::NoSelection(format!("spreadsheet: select one before {}", action))
    }

    pub(crate) fn no_worksheet(action: &str) -> Self {
        AppError::NoSelection(format!("worksheet: select one before {}", action))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
