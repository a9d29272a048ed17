// src/error.rs
use thiserror::Error;

use crate::types::MAX_SCENES;

/// Network failure, non-success HTTP status, or a malformed response body
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// User input rejected before any request is issued
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Campaign ID missing")]
    MissingCampaignId,
    #[error("Number of scenes must be between 1 and {max}, got {0}", max = MAX_SCENES)]
    SceneCountOutOfRange(u32),
}

/// Structurally valid but incomplete data; degrades one item, never halts a phase
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataWarning {
    #[error("No images were returned from the backend.")]
    NoScenes,
    #[error("Image URL missing")]
    ImageUrlMissing,
    #[error("Unable to fetch video for download")]
    DownloadUnavailable,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("A generation request is already in progress")]
    Busy,
}

impl WorkflowError {
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::Transport(_) => "transport",
            WorkflowError::Validation(_) => "validation",
            WorkflowError::Busy => "busy",
        }
    }
}

/// Startup misconfiguration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("BACKEND_URL is not set in the environment or the secret store")]
    MissingBaseUrl,
    #[error("Failed to read secrets file {path}: {source}")]
    SecretsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse secrets file {path}: {source}")]
    SecretsFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_surfaced_verbatim() {
        let err: WorkflowError = TransportError::new("operation timed out").into();
        assert_eq!(err.to_string(), "operation timed out");
        assert_eq!(err.kind(), "transport");

        let err: WorkflowError = ValidationError::MissingCampaignId.into();
        assert_eq!(err.to_string(), "Campaign ID missing");
        assert_eq!(
            ValidationError::SceneCountOutOfRange(9).to_string(),
            "Number of scenes must be between 1 and 5, got 9"
        );
    }
}
