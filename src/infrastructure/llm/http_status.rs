use reqwest::{Response, StatusCode};

use crate::application::ports::LlmClientError;

/// Maps a non-success provider reply to the port error, keeping the body for
/// diagnostics.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, LlmClientError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LlmClientError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmClientError::ApiRequestFailed(format!(
            "HTTP {}: {}",
            status, body
        )));
    }

    Ok(response)
}
