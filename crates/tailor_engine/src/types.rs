use std::path::PathBuf;

use tailor_core::{
    FAILED_TO_TAILOR_MESSAGE, TRANSPORT_FAILURE_MESSAGE, UNEXPECTED_RESPONSE_MESSAGE,
};
use thiserror::Error;

use crate::persist::PersistError;

/// Everything that can go wrong between dispatching a submission and
/// holding a download link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// No response arrived (connect refused, DNS, timeout, dropped body).
    #[error("transport failure: {detail}")]
    Transport {
        detail: String,
        /// Human-readable text specific to this failure, when there is one.
        user_message: Option<String>,
    },
    /// Non-success status; `message` is the server's `detail` or the fallback.
    #[error("server reported status {status}: {message}")]
    ServerReported { status: u16, message: String },
    /// Success status with an `error` field or no recognizable payload.
    #[error("server returned status {status} without a download link: {message}")]
    ServerLogic { status: u16, message: String },
    /// Body could not be decoded as JSON or exceeded the response cap.
    #[error("malformed response with status {status}: {detail}")]
    MalformedResponse { status: u16, detail: String },
}

impl SubmitError {
    pub(crate) fn server_reported(status: u16, detail: Option<String>) -> Self {
        Self::ServerReported {
            status,
            message: detail.unwrap_or_else(|| FAILED_TO_TAILOR_MESSAGE.to_string()),
        }
    }

    pub(crate) fn unexpected_payload(status: u16) -> Self {
        Self::ServerLogic {
            status,
            message: UNEXPECTED_RESPONSE_MESSAGE.to_string(),
        }
    }

    /// Text to show the user for this failure. Never empty.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Transport {
                user_message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            SubmitError::Transport { .. } | SubmitError::MalformedResponse { .. } => {
                TRANSPORT_FAILURE_MESSAGE.to_string()
            }
            SubmitError::ServerReported { message, .. }
            | SubmitError::ServerLogic { message, .. } => message.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Build(String),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid download link {link}: {reason}")]
    InvalidLink { link: String, reason: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("download failed with status {status}: {message}")]
    HttpStatus { status: u16, message: String },
    /// The service answered with a JSON error body instead of the document.
    #[error("server error: {0}")]
    Server(String),
    #[error("download too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// A generated document saved to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub path: PathBuf,
    pub source_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}
