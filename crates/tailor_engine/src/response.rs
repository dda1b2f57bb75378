use serde_json::Value;

use crate::SubmitError;

/// Maps a tailor endpoint response to the raw download link or an error.
pub(crate) fn classify_response(
    status: u16,
    is_success: bool,
    body: &[u8],
) -> Result<String, SubmitError> {
    let payload: Value =
        serde_json::from_slice(body).map_err(|err| SubmitError::MalformedResponse {
            status,
            detail: err.to_string(),
        })?;

    if !is_success {
        return Err(SubmitError::server_reported(
            status,
            detail_message(payload.get("detail")),
        ));
    }

    if let Some(link) = non_empty_str(payload.get("download_link")) {
        return Ok(link.to_string());
    }
    if let Some(message) = non_empty_str(payload.get("error")) {
        return Err(SubmitError::ServerLogic {
            status,
            message: message.to_string(),
        });
    }
    Err(SubmitError::unexpected_payload(status))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

/// `detail` is a plain string for handled errors and a list of
/// `{loc, msg, type}` records for form validation failures.
fn detail_message(detail: Option<&Value>) -> Option<String> {
    match detail? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.as_str()),
                    Value::Object(_) => item.get("msg").and_then(Value::as_str),
                    _ => None,
                })
                .filter(|text| !text.trim().is_empty())
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
