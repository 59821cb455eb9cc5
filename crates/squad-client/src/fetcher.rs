use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use squad_core::error::AppError;
use squad_core::traits::Fetcher;
use url::Url;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0 squad/0.1";

/// HTTP fetcher using reqwest.
///
/// Downloads raw HTML with a browser-like User-Agent and a request timeout.
/// The source site rejects bare client user agents, and serves the English
/// date and currency formats only with an English `Accept-Language`.
///
/// A fetcher can be pinned to one origin with
/// [`restrict_to`](Self::restrict_to); URLs on any other host are then
/// refused before a request is made.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
    allowed_host: Option<String>,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        Self::build(timeout, DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(timeout: Duration, user_agent: &str) -> Result<Self, AppError> {
        Self::build(timeout, user_agent)
    }

    fn build(timeout: Duration, user_agent: &str) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-GB,en;q=0.8"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
            allowed_host: None,
        })
    }

    /// Only allow requests to the host of `origin`.
    pub fn restrict_to(mut self, origin: &str) -> Result<Self, AppError> {
        let parsed = Url::parse(origin)
            .map_err(|e| AppError::ConfigError(format!("Invalid origin '{origin}': {e}")))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| AppError::ConfigError(format!("Origin '{origin}' has no host")))?;
        self.allowed_host = Some(host.to_ascii_lowercase());
        Ok(self)
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        validate_url(url, self.allowed_host.as_deref())?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))?;
        tracing::debug!(%url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Reject URLs that are not http(s), or not on the allowed host.
fn validate_url(url: &str, allowed_host: Option<&str>) -> Result<(), AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::HttpError(format!("Invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::HttpError(format!(
                "URL scheme '{scheme}' is not allowed (only http/https)"
            )));
        }
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::HttpError("URL has no host".to_string()))?;

    if let Some(allowed) = allowed_host {
        if !host.eq_ignore_ascii_case(allowed) {
            return Err(AppError::HttpError(format!(
                "Host '{host}' is outside the allowed origin '{allowed}'"
            )));
        }
    }

    Ok(())
}
