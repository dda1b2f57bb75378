use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;
use tailor_core::UNEXPECTED_RESPONSE_MESSAGE;
use tailor_logging::{tailor_info, tailor_warn};
use url::Url;

use crate::client::{error_chain, read_capped_body};
use crate::filename::artifact_filename;
use crate::persist::ArtifactStore;
use crate::{DownloadError, DownloadedArtifact, ReqwestSubmissionClient};

impl ReqwestSubmissionClient {
    /// Fetches the document behind a (normalized) download link and stores
    /// it in `output_dir` under a name derived from the link.
    pub async fn download(
        &self,
        download_url: &str,
        output_dir: &Path,
    ) -> Result<DownloadedArtifact, DownloadError> {
        let url = self
            .base
            .join(download_url)
            .map_err(|err| DownloadError::InvalidLink {
                link: download_url.to_string(),
                reason: err.to_string(),
            })?;

        tailor_info!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| DownloadError::Transport(error_chain(&err)))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        // A missing file is reported as a 200 with a JSON error body.
        let is_error_body = content_type.as_deref().is_some_and(is_json);
        if !status.is_success() || is_error_body {
            let body = read_capped_body(response, self.settings.max_response_bytes)
                .await
                .unwrap_or_default();
            return Err(error_from_body(&url, status, &body));
        }

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(DownloadError::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let store = ArtifactStore::new(PathBuf::from(output_dir));
        let mut staged = store.stage(&artifact_filename(&url))?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| DownloadError::Transport(error_chain(&err)))?;
            let next_len = staged.written() + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(DownloadError::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            staged.append(&chunk)?;
        }

        let byte_len = staged.written();
        let path = staged.commit()?;
        tailor_info!("Saved {} bytes to {:?}", byte_len, path);

        Ok(DownloadedArtifact {
            path,
            source_url: url.to_string(),
            content_type,
            byte_len,
        })
    }
}

fn error_from_body(url: &Url, status: StatusCode, body: &[u8]) -> DownloadError {
    if !status.is_success() {
        let message = json_field(body, "detail")
            .or_else(|| json_field(body, "error"))
            .unwrap_or_else(|| status.to_string());
        tailor_warn!("Download of {} failed with {}: {}", url, status, message);
        return DownloadError::HttpStatus {
            status: status.as_u16(),
            message,
        };
    }
    let message = json_field(body, "error")
        .unwrap_or_else(|| UNEXPECTED_RESPONSE_MESSAGE.to_string());
    tailor_warn!("Download of {} returned an error body: {}", url, message);
    DownloadError::Server(message)
}

fn is_json(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    mime.eq_ignore_ascii_case("application/json")
}

fn json_field(body: &[u8], field: &str) -> Option<String> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    payload
        .get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
