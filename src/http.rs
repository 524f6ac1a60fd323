//! HTTP utilities for cloud REST API calls

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and masks potentially sensitive patterns
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        format!("{}... [truncated, {} bytes total]", &body[..MAX_LOG_BODY_LENGTH], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Bearer-authenticated HTTP client bound to one provider host.
///
/// The token is set once per assistant session, before any listing
/// begins, and is read-only for the rest of the session.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpClient {
    /// Create a client for the given base URL, e.g. `https://management.azure.com`.
    pub fn new(base: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("vmscout/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base = Url::parse(base)?;

        Ok(Self { client, base, token: None })
    }

    /// Attach the bearer token obtained from the external OAuth flow.
    pub fn set_auth_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// GET `path` relative to the base URL and parse the JSON body.
    ///
    /// Non-2xx responses become [`Error::Api`] carrying the status code.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.base.join(path.trim_start_matches('/'))?;

        tracing::debug!("GET {}", url);

        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: only log sanitized/truncated error body
            let body = sanitize_for_log(&body);
            tracing::error!("API error: {} - {}", status, body);
            return Err(Error::Api { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let out = sanitize_for_log(&body);
        assert!(out.contains("truncated"));
        assert!(out.len() < body.len());
    }

    #[test]
    fn sanitize_strips_control_characters() {
        let out = sanitize_for_log("ok\x1b[31m\nline");
        assert_eq!(out, "ok[31mline");
    }
}
