//! reqwest-based transport

use std::time::Duration;

use super::{ResponseBody, Transport, TransportRequest, TransportResponse};
use crate::error::TransportError;

/// Transport backed by a [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    /// Create a transport with reqwest's default settings
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Create a new transport builder
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Create a transport from an existing reqwest::Client
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let TransportRequest {
            method,
            url,
            headers,
            body,
            ..
        } = request;

        let response = self
            .inner
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(TransportError::from)?;

        let status = response.status();
        let headers = response.headers().clone();
        let mut parts = TransportResponse::new(status.as_u16(), headers, ReqwestBody(response));
        if let Some(reason) = status.canonical_reason() {
            parts = parts.with_reason(reason);
        }
        Ok(parts)
    }
}

struct ReqwestBody(reqwest::Response);

#[async_trait::async_trait]
impl ResponseBody for ReqwestBody {
    async fn bytes(self: Box<Self>) -> Result<Vec<u8>, TransportError> {
        self.0
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(TransportError::from)
    }
}

/// Builder for configuring timeouts, proxy and TLS settings of a [`ReqwestTransport`]
#[derive(Debug, Default)]
pub struct ReqwestTransportBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
    accept_invalid_certs: bool,
    proxy: Option<ProxyConfig>,
}

#[derive(Debug)]
struct ProxyConfig {
    url: url::Url,
    matcher: Option<regex::Regex>,
}

impl ReqwestTransportBuilder {
    /// Total timeout applied by reqwest to every request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// User-Agent sent with every request
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Accept invalid TLS certificates
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Route every request through a proxy
    pub fn proxy(mut self, url: url::Url) -> Self {
        self.proxy = Some(ProxyConfig { url, matcher: None });
        self
    }

    /// Route requests whose host matches `pattern` through a proxy
    pub fn proxy_with_matcher(
        mut self,
        url: url::Url,
        pattern: &str,
    ) -> Result<Self, TransportError> {
        let matcher = regex::Regex::new(pattern)
            .map_err(|e| TransportError::Proxy(format!("Invalid proxy pattern: {}", e)))?;
        self.proxy = Some(ProxyConfig {
            url,
            matcher: Some(matcher),
        });
        Ok(self)
    }

    /// Build the transport
    pub fn build(self) -> Result<ReqwestTransport, TransportError> {
        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(self.accept_invalid_certs);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        if let Some(proxy_config) = self.proxy {
            let proxy_url = proxy_config.url.to_string();
            let proxy = if let Some(matcher) = proxy_config.matcher {
                reqwest::Proxy::custom(move |url| {
                    if matcher.is_match(url.host_str().unwrap_or("")) {
                        Some(proxy_url.clone())
                    } else {
                        None
                    }
                })
            } else {
                reqwest::Proxy::all(&proxy_url).map_err(|e| TransportError::Proxy(e.to_string()))?
            };
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(ReqwestTransport { inner: client })
    }
}
