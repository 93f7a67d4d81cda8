use super::transport::{Reply, Transport};
use super::wire::http_url;
use crate::errors::{Error, StatusCode, TransportError, UsageError};
use crate::request::Request;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Host name or IP address of the PWI4 server.
    ///
    /// Defaults to `localhost`.
    pub host: String,
    /// HTTP port of the PWI4 server.
    ///
    /// Defaults to 8220.
    pub port: u16,
    /// Hard cap on each request, including reading the reply.
    ///
    /// Defaults to 3 seconds.
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 8220,
            timeout: Duration::from_secs(3),
        }
    }
}

impl HttpConfig {
    /// Base URL all command paths are appended to.
    pub fn base_url(&self) -> Result<Url, UsageError> {
        Ok(Url::parse(&format!(
            "http://{host}:{port}/",
            host = self.host,
            port = self.port
        ))?)
    }
}

/// Stateless transport: one HTTP GET per command.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the server described by `config`.
    pub fn new(config: &HttpConfig) -> Result<Self, Error> {
        Self::with_base_url(config.base_url()?, config.timeout)
    }

    /// Create a transport for an explicit base URL, e.g. `http://10.0.0.5:8220/`.
    pub fn with_base_url(base_url: Url, timeout: Duration) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(UsageError::InvalidBaseUrl {
                url: base_url.into(),
            }
            .into());
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::from)?;

        Ok(Self { client, base_url })
    }

    /// Base URL of the server.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&mut self, request: &Request) -> Result<Reply, Error> {
        let url = http_url(&self.base_url, request)?;

        tracing::trace!(%url, "Sending GET request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(TransportError::from)?;

        let status = response.status();
        let body = response.bytes().await.map_err(TransportError::from)?;

        if status != reqwest::StatusCode::OK {
            let code = StatusCode::from(status);
            let body = String::from_utf8_lossy(&body).into_owned();
            tracing::warn!(?code, %body, "Server returned an error status");
            return Err(TransportError::Status {
                code,
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
                body,
            }
            .into());
        }

        Ok(if body.trim_ascii().is_empty() {
            Reply::Empty
        } else {
            Reply::Status(body)
        })
    }
}
