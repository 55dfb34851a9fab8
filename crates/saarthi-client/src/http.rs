//! Status checks shared by every request the crate sends.

use serde::Deserialize;

use crate::error::ClientError;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Pass successful responses through; turn anything else into [`ClientError::Api`].
pub(crate) async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| body.trim().to_string())
}
