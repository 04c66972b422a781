// File: ./src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LostFoundError>;

#[derive(Debug, Error)]
pub enum LostFoundError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Image upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Storage error: {0}")]
    Persistence(String),

    #[error("No item with id {0}")]
    NotFound(String),

    #[error("Item {0} is already resolved")]
    InvalidTransition(String),

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("the selected file is empty")]
    EmptyFile,

    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("upload endpoint rejected the file: {0}")]
    Remote(String),
}

impl From<std::io::Error> for LostFoundError {
    fn from(e: std::io::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for LostFoundError {
    fn from(e: serde_json::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}
