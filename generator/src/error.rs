//! Generator error types

use shared::{ImageFailure, SharedError};
use thiserror::Error;

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Generator error types
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Server returned status {status}")]
    Server { status: u16 },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Failed to parse story script: {message}")]
    Parse { message: String },

    #[error("Story generation failed: {reason}")]
    StoryGeneration { reason: Box<GeneratorError> },

    #[error("Image generation failed for page {page_number}: {failure}")]
    ImageGeneration { page_number: u32, failure: ImageFailure },

    #[error("Bookshelf is full ({limit} books); delete a book before saving")]
    StorageFull { limit: usize },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl GeneratorError {
    pub fn network(message: impl Into<String>) -> Self {
        GeneratorError::Network {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        GeneratorError::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        GeneratorError::Parse {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        GeneratorError::Config {
            message: message.into(),
        }
    }

    /// Wrap a story-layer failure that aborts the whole session
    pub fn story(reason: GeneratorError) -> Self {
        GeneratorError::StoryGeneration {
            reason: Box::new(reason),
        }
    }
}

impl From<SharedError> for GeneratorError {
    fn from(error: SharedError) -> Self {
        GeneratorError::Config {
            message: error.to_string(),
        }
    }
}
