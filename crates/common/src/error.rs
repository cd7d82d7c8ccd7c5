//! Error types shared across DPFrame crates.

use std::path::PathBuf;

/// Top-level error type for DPFrame operations.
#[derive(Debug, thiserror::Error)]
pub enum DpframeError {
    /// The caller supplied no image at all. The one user-correctable
    /// error in the taxonomy; adapters report it as a 4xx-equivalent.
    #[error("No image file provided")]
    NoInput,

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Overlay error ({name}): {message}")]
    Overlay { name: String, message: String },

    #[error("Processing error: {message}")]
    Processing { message: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Resource limit exceeded: {message}")]
    ResourceLimit { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using DpframeError.
pub type DpframeResult<T> = Result<T, DpframeError>;

impl DpframeError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn overlay(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Overlay {
            name: name.into(),
            message: msg.into(),
        }
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn resource_limit(msg: impl Into<String>) -> Self {
        Self::ResourceLimit {
            message: msg.into(),
        }
    }

    /// Whether the error was caused by the caller's request rather than
    /// by processing. Drives the 400-vs-500 split at the HTTP boundary.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::NoInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_message_matches_api_contract() {
        assert_eq!(DpframeError::NoInput.to_string(), "No image file provided");
        assert!(DpframeError::NoInput.is_user_error());
    }

    #[test]
    fn processing_errors_are_not_user_errors() {
        assert!(!DpframeError::decode("bad bytes").is_user_error());
        assert!(!DpframeError::storage("disk full").is_user_error());
    }
}
