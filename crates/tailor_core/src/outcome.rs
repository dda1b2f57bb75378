pub type SubmissionId = u64;

/// Shown when no response arrived and the failure carried no usable text.
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "An error occurred while tailoring the resume. Please try again.";
/// Shown for a non-success status without a `detail` field.
pub const FAILED_TO_TAILOR_MESSAGE: &str = "Failed to tailor resume";
/// Shown for a success status whose body has neither link nor error.
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from server.";

/// Form values captured at the moment the user submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub role: String,
    pub description: String,
}

impl SubmissionRequest {
    pub fn new(role: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            description: description.into(),
        }
    }
}

/// Result of the most recent submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionOutcome {
    Success {
        download_url: String,
    },
    Failure {
        message: String,
    },
    /// Nothing to show: no attempt finished yet, or a new one just started.
    #[default]
    None,
}

impl SubmissionOutcome {
    pub fn success(download_url: impl Into<String>) -> Self {
        Self::Success {
            download_url: download_url.into(),
        }
    }

    /// Builds a failure, substituting the generic retry text for a blank message.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            TRANSPORT_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        Self::Failure { message }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn download_url(&self) -> Option<&str> {
        match self {
            Self::Success { download_url } => Some(download_url),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Failure { message } => Some(message),
            _ => None,
        }
    }
}
