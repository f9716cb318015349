//! Per-call request options
//!
//! Options are plain values applied left to right over
//! [`RequestOptions::default`]. When two options touch the same field the
//! later one wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::transport::Transport;

/// A single per-call option
pub enum RequestOption<'a> {
    /// Set one header, overwriting an earlier value for the same name
    Header(String, String),
    /// Replace the whole header set
    Headers(HashMap<String, String>),
    /// Record the response status code here instead of failing on >= 400
    Status(&'a mut u16),
    /// Use this transport for the call instead of the client's
    Transport(Arc<dyn Transport>),
}

impl fmt::Debug for RequestOption<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header(key, value) => f.debug_tuple("Header").field(key).field(value).finish(),
            Self::Headers(headers) => f.debug_tuple("Headers").field(headers).finish(),
            Self::Status(_) => f.write_str("Status"),
            Self::Transport(transport) => f.debug_tuple("Transport").field(transport).finish(),
        }
    }
}

/// Set a single header for the request
pub fn with_header<'a>(key: impl Into<String>, value: impl Into<String>) -> RequestOption<'a> {
    RequestOption::Header(key.into(), value.into())
}

/// Replace the request headers with `headers`
///
/// Headers set by earlier options are discarded.
pub fn with_headers<'a, I, K, V>(headers: I) -> RequestOption<'a>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    RequestOption::Headers(
        headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    )
}

/// Store the response status code in `status`
///
/// With a status sink, responses >= 400 are not turned into
/// [`crate::HttpError::Status`] and a body that fails to decode on such
/// a response is tolerated.
pub fn with_status(status: &mut u16) -> RequestOption<'_> {
    RequestOption::Status(status)
}

/// Dispatch this call through `transport`
pub fn with_transport<'a>(transport: Arc<dyn Transport>) -> RequestOption<'a> {
    RequestOption::Transport(transport)
}

/// Options in effect for one call
#[derive(Default)]
pub struct RequestOptions<'a> {
    headers: HashMap<String, (String, String)>,
    status: Option<&'a mut u16>,
    transport: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for RequestOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("headers", &self.headers)
            .field("status", &self.status.is_some())
            .field("transport", &self.transport)
            .finish()
    }
}

impl<'a> RequestOptions<'a> {
    /// Fold `options` left to right
    pub fn build<I>(options: I) -> Self
    where
        I: IntoIterator<Item = RequestOption<'a>>,
    {
        let mut built = Self::default();
        for option in options {
            built.apply(option);
        }
        built
    }

    fn apply(&mut self, option: RequestOption<'a>) {
        match option {
            RequestOption::Header(key, value) => self.set_header(key, value),
            RequestOption::Headers(headers) => {
                self.headers.clear();
                for (key, value) in headers {
                    self.set_header(key, value);
                }
            }
            RequestOption::Status(status) => self.status = Some(status),
            RequestOption::Transport(transport) => self.transport = Some(transport),
        }
    }

    fn set_header(&mut self, key: String, value: String) {
        let _ = self.headers.insert(key.to_ascii_lowercase(), (key, value));
    }

    /// Headers as `(name, value)` pairs, one per case-insensitive name
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .values()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns true when a status sink was supplied
    pub fn captures_status(&self) -> bool {
        self.status.is_some()
    }

    /// Per-call transport override
    pub fn transport(&self) -> Option<&Arc<dyn Transport>> {
        self.transport.as_ref()
    }

    pub(crate) fn record_status(&mut self, status: u16) {
        if let Some(sink) = self.status.as_deref_mut() {
            *sink = status;
        }
    }
}
