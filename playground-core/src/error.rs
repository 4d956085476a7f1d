use thiserror::Error;

use crate::model::Language;

pub type PlaygroundResult<T> = Result<T, PlaygroundError>;

#[derive(Debug, Error)]
pub enum PlaygroundError {
    #[error("storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("template '{0}' not found")]
    UnknownTemplate(String),

    #[error("unknown export format '{0}'")]
    UnknownFormat(String),

    #[error("{0} is not available")]
    Unavailable(&'static str),

    #[error("failed to format {language} code: {message}")]
    Format { language: Language, message: String },
}

impl PlaygroundError {
    pub fn storage(key: &str, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
