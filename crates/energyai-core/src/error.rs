//! Error types for EnergyAI

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Email already exists")]
    EmailTaken,

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Mail transport error: {0}")]
    Mail(String),

    #[error("Prediction service error: {0}")]
    Prediction(String),
}

pub type Result<T> = std::result::Result<T, Error>;
