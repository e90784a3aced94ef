use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid chart of accounts: {0}")]
    InvalidChart(String),
    #[error("Invalid {kind} list: {message}")]
    InvalidEntities { kind: &'static str, message: String },
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
