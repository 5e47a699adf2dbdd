//! Error types for the meta-analysis pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Analysis error: {0}")]
    Analysis(#[from] meta_core::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
