use thiserror::Error;

#[derive(Error, Debug)]
pub enum DealHuntError {
    #[error("Data source unavailable: {0}")]
    DataSource(String),

    #[error("Invalid deal {id}: {reason}")]
    InvalidDeal { id: String, reason: String },

    #[error("Deal not found: {0}")]
    DealNotFound(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid deal URL: {0}")]
    InvalidUrl(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
