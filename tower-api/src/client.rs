//! Authenticated HTTP client handle

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{ApiError, ApiResult};
use crate::types::Model;

/// Settings for [`AuthenticatedClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address all endpoint paths are joined to, e.g. `https://api.tower.dev/v1`
    pub base_url: String,
    pub token: String,
    /// Header carrying the credential
    pub auth_header_name: String,
    /// Placed before the token in the header value when non-empty
    pub prefix: String,
    pub verify_ssl: bool,
    /// Treat responses outside 2xx as errors rather than empty results
    pub raise_on_unexpected_status: bool,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tower.dev/v1".into(),
            token: String::new(),
            auth_header_name: "X-API-Key".into(),
            prefix: String::new(),
            verify_ssl: false,
            raise_on_unexpected_status: true,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Value sent in the auth header
    pub fn auth_value(&self) -> String {
        if self.prefix.is_empty() {
            self.token.clone()
        } else {
            format!("{} {}", self.prefix, self.token)
        }
    }
}

/// Client handle passed to every endpoint call
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl AuthenticatedClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        if !config.token.is_empty() {
            let name = HeaderName::from_bytes(config.auth_header_name.as_bytes()).map_err(|e| {
                ApiError::InvalidArgument {
                    name: "auth_header_name".into(),
                    message: e.to_string(),
                }
            })?;
            let mut value =
                HeaderValue::from_str(&config.auth_value()).map_err(|e| ApiError::InvalidArgument {
                    name: "token".into(),
                    message: e.to_string(),
                })?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .timeout(config.timeout)
            .build()?;

        debug!(base_url = %config.base_url, verify_ssl = config.verify_ssl, "API client ready");
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Full URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send a request and parse a JSON response body as `T`
    ///
    /// An empty 2xx body yields `None`. Other statuses either fail with
    /// [`ApiError::UnexpectedStatus`] or yield `None`, depending on
    /// `raise_on_unexpected_status`.
    pub async fn request<T: Model>(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<Value>,
    ) -> ApiResult<Option<T>> {
        let url = self.url(path);
        trace!(%method, %url, "sending request");

        let mut builder = self.http.request(method, &url).query(query.pairs());
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let content = response.text().await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), %url, "unexpected status");
            if self.config.raise_on_unexpected_status {
                return Err(ApiError::UnexpectedStatus {
                    status: status.as_u16(),
                    content,
                });
            }
            return Ok(None);
        }

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ApiError::Decode(format!("{}: {}", T::NAME, e)))
    }

    /// Like [`request`](Self::request) for endpoints with no response body
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<Value>,
    ) -> ApiResult<()> {
        let url = self.url(path);
        trace!(%method, %url, "sending request");

        let mut builder = self.http.request(method, &url).query(query.pairs());
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() && self.config.raise_on_unexpected_status {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                content: response.text().await?,
            });
        }
        Ok(())
    }
}

/// Query-string parameters, skipping unset values
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &'static str, value: impl ToString) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    pub fn push_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}
