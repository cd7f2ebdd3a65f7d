use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("mapping table error: {0}")]
    Mapping(String),
    #[error("platform error: {0}")]
    Platform(String),
    #[error("recommendation {id}: {reason}")]
    Recommendation { id: String, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn recommendation(id: &str, reason: impl Into<String>) -> Self {
        AppError::Recommendation {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
