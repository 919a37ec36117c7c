//! Shared response decoding for the provider HTTP surfaces.

use serde_json::Value;

use crate::error::YogiError;

/// Human-readable status text, e.g. `"Not Found"`.
pub(crate) fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

/// Map a response to its JSON body.
///
/// 404 becomes [`YogiError::NotFound`] naming `resource`; any other non-2xx
/// becomes [`YogiError::Upstream`] carrying the upstream status text.
pub(crate) async fn decode_json(
    provider: &str,
    resource: &str,
    response: reqwest::Response,
) -> Result<Value, YogiError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(YogiError::NotFound(format!("{resource} not found")));
    }
    if !status.is_success() {
        return Err(YogiError::Upstream {
            provider: provider.to_string(),
            status: status_text(status),
        });
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| YogiError::Parse(format!("{provider}: invalid JSON response: {e}")))
}

/// Map a response to its raw body bytes, with the same error mapping as
/// [`decode_json`].
#[cfg(feature = "elevenlabs")]
pub(crate) async fn decode_bytes(
    provider: &str,
    resource: &str,
    response: reqwest::Response,
) -> Result<Vec<u8>, YogiError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(YogiError::NotFound(format!("{resource} not found")));
    }
    if !status.is_success() {
        return Err(YogiError::Upstream {
            provider: provider.to_string(),
            status: status_text(status),
        });
    }
    Ok(response.bytes().await?.to_vec())
}
