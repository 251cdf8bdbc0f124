//! Shared HTTP response handling for provider clients.

use crate::LlmError;

/// Return the response unchanged on success, or [`LlmError::Api`] carrying the
/// status code and body.
pub(crate) async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, LlmError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Build a client with the configured whole-request timeout.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, LlmError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("voxql/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_configured_timeout() {
        assert!(build_client(120).is_ok());
    }
}
