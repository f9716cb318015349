//! Transport capability used to dispatch requests
//!
//! The client never talks to the network itself. It hands a fully-formed
//! [`TransportRequest`] to a [`Transport`] and interprets the
//! [`TransportResponse`] that comes back.

use std::fmt::Debug;

use reqwest::header::HeaderMap;
use reqwest::Method;
use url::Url;

use crate::context::Context;
use crate::error::TransportError;

mod reqwest_transport;

pub use reqwest_transport::{ReqwestTransport, ReqwestTransportBuilder};

/// Sends a request and returns the response or a transport failure
#[async_trait::async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Dispatch `request`
    ///
    /// Implementations perform exactly one attempt; retries are not part
    /// of this contract.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Response body that can be read exactly once
#[async_trait::async_trait]
pub trait ResponseBody: Send {
    /// Read the whole body
    async fn bytes(self: Box<Self>) -> Result<Vec<u8>, TransportError>;
}

#[async_trait::async_trait]
impl ResponseBody for Vec<u8> {
    async fn bytes(self: Box<Self>) -> Result<Vec<u8>, TransportError> {
        Ok(*self)
    }
}

/// Fully-formed request handed to a [`Transport`]
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP verb
    pub method: Method,
    /// Target URL
    pub url: Url,
    /// Headers, one value per name
    pub headers: HeaderMap,
    /// Wire payload, empty for GET and DELETE
    pub body: Vec<u8>,
    /// Context of the call that built this request
    pub context: Context,
}

/// Response returned by a [`Transport`]
pub struct TransportResponse {
    status: u16,
    reason: Option<String>,
    headers: HeaderMap,
    body: Box<dyn ResponseBody>,
}

impl Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl TransportResponse {
    /// Create a response from its parts
    pub fn new(status: u16, headers: HeaderMap, body: impl ResponseBody + 'static) -> Self {
        Self {
            status,
            reason: None,
            headers,
            body: Box::new(body),
        }
    }

    /// Override the reason phrase used in the status line
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Status line such as `404 Not Found`
    pub fn status_line(&self) -> String {
        let reason = self.reason.as_deref().or_else(|| {
            reqwest::StatusCode::from_u16(self.status)
                .ok()
                .and_then(|code| code.canonical_reason())
        });
        match reason {
            Some(reason) => format!("{} {}", self.status, reason),
            None => self.status.to_string(),
        }
    }

    /// Consume the response and read its whole body
    pub async fn bytes(self) -> Result<Vec<u8>, TransportError> {
        self.body.bytes().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_canonical_reason() {
        let response = TransportResponse::new(404, HeaderMap::new(), Vec::new());
        assert_eq!(response.status_line(), "404 Not Found");
    }

    #[test]
    fn test_status_line_custom_reason() {
        let response =
            TransportResponse::new(418, HeaderMap::new(), Vec::new()).with_reason("Short and stout");
        assert_eq!(response.status_line(), "418 Short and stout");
    }

    #[test]
    fn test_status_line_unknown_code() {
        let response = TransportResponse::new(599, HeaderMap::new(), Vec::new());
        assert_eq!(response.status_line(), "599");
    }

    #[tokio::test]
    async fn test_in_memory_body() {
        let response = TransportResponse::new(200, HeaderMap::new(), b"{}".to_vec());
        assert_eq!(response.status(), 200);
        assert_eq!(response.bytes().await.expect("in-memory body"), b"{}");
    }
}
