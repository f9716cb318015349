//! HTTP error types

use std::fmt;

use reqwest::Method;
use thiserror::Error;

/// Errors returned by the request/response protocol
///
/// Each variant corresponds to the step of the call that failed. The
/// triggering cause is kept reachable through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request could not be constructed, no network I/O happened
    #[error("failed to create {method} request: {source}")]
    Request {
        /// HTTP verb of the failed call
        method: Method,
        /// What went wrong while building the request
        #[source]
        source: RequestError,
    },
    /// The transport failed to dispatch the request or to read the response
    #[error("failed to make {method} request: {source}")]
    Transport {
        /// HTTP verb of the failed call
        method: Method,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },
    /// HTTP error with status code
    #[error("HTTP error ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Status line reported by the server
        message: String,
    },
    /// The response body could not be decoded into the result
    #[error("failed to unmarshal JSON response: {0}")]
    Decode(#[source] CodecError),
}

impl HttpError {
    /// Status code carried by [`HttpError::Status`], if any
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when the call was aborted by its [`crate::Context`]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            HttpError::Transport {
                source: TransportError::Cancelled | TransportError::DeadlineExceeded,
                ..
            }
        )
    }
}

/// Failures while turning the call arguments into a transport request
#[derive(Debug, Error)]
pub enum RequestError {
    /// The marshal collaborator rejected the body
    #[error("failed to marshal request body: {0}")]
    Marshal(#[source] CodecError),
    /// The target URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// A header name or value is not valid HTTP
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader {
        /// Offending header name
        name: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Errors raised by a [`crate::Transport`]
#[derive(Debug, Error)]
pub enum TransportError {
    /// The call's context was cancelled
    #[error("context cancelled")]
    Cancelled,
    /// The call's context deadline passed
    #[error("context deadline exceeded")]
    DeadlineExceeded,
    /// Request timeout
    #[error("Request timeout")]
    Timeout,
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Reading the response body failed
    #[error("Body error: {0}")]
    Body(String),
    /// Proxy error
    #[error("Proxy error: {0}")]
    Proxy(String),
    /// Client build error
    #[error("Client build error: {0}")]
    Build(String),
    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_builder() {
            TransportError::Build(err.to_string())
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Error produced by a marshal or unmarshal collaborator
pub struct CodecError(Box<dyn std::error::Error + Send + Sync>);

impl CodecError {
    /// Wrap any error raised while encoding or decoding
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self(err.into())
    }

    /// Build an error from a plain message
    pub fn msg(message: impl fmt::Display) -> Self {
        Self(message.to_string().into())
    }
}

impl fmt::Debug for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodecError").field(&self.0).finish()
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err)
    }
}
