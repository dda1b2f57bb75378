use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::Form;
use tailor_core::{SubmissionRequest, API_MOUNT_PATH};
use tailor_logging::{clip, tailor_debug, tailor_info, tailor_warn};
use url::Url;

use crate::response::classify_response;
use crate::{ClientError, SubmitError};

/// Path of the tailor operation below the mount path.
pub const TAILOR_RESUME_PATH: &str = "tailor_resume/";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Origin the site is served from, e.g. `http://localhost:3000`.
    pub base_url: String,
    /// Gateway prefix of the generation service.
    pub mount_path: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
    pub max_download_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            mount_path: API_MOUNT_PATH.to_string(),
            connect_timeout: Duration::from_secs(10),
            // Generation runs an LLM call and a PDF compile per request.
            request_timeout: Duration::from_secs(120),
            max_response_bytes: 1024 * 1024,
            max_download_bytes: 20 * 1024 * 1024,
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    fn parsed_base(&self) -> Result<Url, ClientError> {
        let base = Url::parse(&self.base_url).map_err(|err| ClientError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "url cannot be used as a base".to_string(),
            });
        }
        Ok(base)
    }

    fn endpoint(&self, base: &Url) -> Result<Url, ClientError> {
        let mount = self.mount_path.trim_matches('/');
        let path = if mount.is_empty() {
            format!("/{TAILOR_RESUME_PATH}")
        } else {
            format!("/{mount}/{TAILOR_RESUME_PATH}")
        };
        base.join(&path).map_err(|err| ClientError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })
    }
}

/// Sends one submission to the generation service.
///
/// Implementations return the download link exactly as the server sent it;
/// normalization against the mount path happens in the controller.
#[async_trait::async_trait]
pub trait SubmissionClient: Send + Sync {
    async fn post_submission(&self, request: &SubmissionRequest) -> Result<String, SubmitError>;

    /// Prefix applied to root-relative download links.
    fn mount_path(&self) -> &str {
        API_MOUNT_PATH
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmissionClient {
    pub(crate) settings: ClientSettings,
    pub(crate) client: reqwest::Client,
    pub(crate) base: Url,
    endpoint: Url,
}

impl ReqwestSubmissionClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base = settings.parsed_base()?;
        let endpoint = settings.endpoint(&base)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;

        Ok(Self {
            settings,
            client,
            base,
            endpoint,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn map_transport_error(&self, err: reqwest::Error) -> SubmitError {
        let detail = error_chain(&err);
        tailor_warn!("Transport failure talking to {}: {}", self.endpoint, detail);
        let user_message = if err.is_timeout() {
            let limit = if err.is_connect() {
                self.settings.connect_timeout
            } else {
                self.settings.request_timeout
            };
            Some(format!(
                "The request timed out after {}. Please try again.",
                describe_duration(limit)
            ))
        } else {
            None
        };
        SubmitError::Transport {
            detail,
            user_message,
        }
    }
}

#[async_trait::async_trait]
impl SubmissionClient for ReqwestSubmissionClient {
    async fn post_submission(&self, request: &SubmissionRequest) -> Result<String, SubmitError> {
        let form = Form::new()
            .text("role", request.role.clone())
            .text("job_description_text", request.description.clone());

        tailor_info!(
            "POST {} role={}",
            self.endpoint,
            clip(&request.role, 80)
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status();
        tailor_debug!("Tailor endpoint answered {}", status);

        let body = read_capped_body(response, self.settings.max_response_bytes)
            .await
            .map_err(|err| match err {
                BodyError::Transport(err) => self.map_transport_error(err),
                BodyError::TooLarge { max_bytes, actual } => SubmitError::MalformedResponse {
                    status: status.as_u16(),
                    detail: format!("response too large (max {max_bytes}, actual {actual:?})"),
                },
            })?;

        let result = classify_response(status.as_u16(), status.is_success(), &body);
        if let Err(SubmitError::MalformedResponse { .. }) = &result {
            tailor_warn!(
                "Unparseable body from tailor endpoint: {}",
                clip(&String::from_utf8_lossy(&body), 200)
            );
        }
        result
    }

    fn mount_path(&self) -> &str {
        &self.settings.mount_path
    }
}

pub(crate) enum BodyError {
    Transport(reqwest::Error),
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

/// Streams the body into memory, refusing to grow past `max_bytes`.
pub(crate) async fn read_capped_body(
    response: reqwest::Response,
    max_bytes: u64,
) -> Result<Vec<u8>, BodyError> {
    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(BodyError::TooLarge {
                max_bytes,
                actual: Some(content_len),
            });
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(BodyError::Transport)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(BodyError::TooLarge {
                max_bytes,
                actual: Some(next_len),
            });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Display text of `err` followed by each of its sources.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Whole seconds when exact, milliseconds otherwise, so a limit is never
/// reported shorter than it is.
fn describe_duration(duration: Duration) -> String {
    if duration.subsec_nanos() != 0 {
        return format!("{} ms", duration.as_millis());
    }
    match duration.as_secs() {
        1 => "1 second".to_string(),
        secs => format!("{secs} seconds"),
    }
}
