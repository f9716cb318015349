//! HTTP client wrapper

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::codec::{JsonCodec, Marshal, Unmarshal};
use crate::context::Context;
use crate::error::{HttpError, RequestError, TransportError};
use crate::options::{RequestOption, RequestOptions};
use crate::request::Payload;
use crate::response::Response;
use crate::transport::{ReqwestTransport, Transport, TransportRequest};

/// JSON HTTP client
///
/// Holds a transport and the marshal/unmarshal collaborators. All three
/// are read-only after construction, so a client can be cloned and shared
/// between tasks freely.
#[derive(Clone)]
pub struct HttpClient<M = JsonCodec, U = JsonCodec> {
    transport: Arc<dyn Transport>,
    marshal: M,
    unmarshal: U,
}

impl<M, U> fmt::Debug for HttpClient<M, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport::new())
    }

    /// Create a new HTTP client builder
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create an HttpClient dispatching through `transport`
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            marshal: JsonCodec,
            unmarshal: JsonCodec,
        }
    }

    /// Create an HttpClient from a reqwest::Client
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self::with_transport(ReqwestTransport::from_reqwest(client))
    }
}

impl<M, U> HttpClient<M, U>
where
    M: Marshal,
    U: Unmarshal,
{
    /// GET request, decodes the response body into `result`
    pub async fn get<'a, R>(
        &self,
        ctx: &Context,
        url: &str,
        result: Option<&mut R>,
        options: impl IntoIterator<Item = RequestOption<'a>>,
    ) -> Response<()>
    where
        R: DeserializeOwned,
    {
        self.execute::<(), R>(ctx, Method::GET, url, None, result, options)
            .await
    }

    /// POST with a JSON (or raw) body, decodes the response body into `result`
    ///
    /// `Content-Type: application/json` is always sent, replacing any value
    /// supplied through the options.
    pub async fn post<'a, B, R>(
        &self,
        ctx: &Context,
        url: &str,
        body: Payload<'_, B>,
        result: Option<&mut R>,
        options: impl IntoIterator<Item = RequestOption<'a>>,
    ) -> Response<()>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(ctx, Method::POST, url, Some(body), result, options)
            .await
    }

    /// PUT with a JSON (or raw) body, decodes the response body into `result`
    pub async fn put<'a, B, R>(
        &self,
        ctx: &Context,
        url: &str,
        body: Payload<'_, B>,
        result: Option<&mut R>,
        options: impl IntoIterator<Item = RequestOption<'a>>,
    ) -> Response<()>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(ctx, Method::PUT, url, Some(body), result, options)
            .await
    }

    /// PATCH with a JSON (or raw) body, decodes the response body into `result`
    ///
    /// `Content-Type: application/json` is always sent, replacing any value
    /// supplied through the options.
    pub async fn patch<'a, B, R>(
        &self,
        ctx: &Context,
        url: &str,
        body: Payload<'_, B>,
        result: Option<&mut R>,
        options: impl IntoIterator<Item = RequestOption<'a>>,
    ) -> Response<()>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(ctx, Method::PATCH, url, Some(body), result, options)
            .await
    }

    /// DELETE request, decodes the response body into `result`
    pub async fn delete<'a, R>(
        &self,
        ctx: &Context,
        url: &str,
        result: Option<&mut R>,
        options: impl IntoIterator<Item = RequestOption<'a>>,
    ) -> Response<()>
    where
        R: DeserializeOwned,
    {
        self.execute::<(), R>(ctx, Method::DELETE, url, None, result, options)
            .await
    }

    #[instrument(skip_all, fields(method = %method, url = %url))]
    async fn execute<'a, B, R>(
        &self,
        ctx: &Context,
        method: Method,
        url: &str,
        body: Option<Payload<'_, B>>,
        result: Option<&mut R>,
        options: impl IntoIterator<Item = RequestOption<'a>>,
    ) -> Response<()>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut options = RequestOptions::build(options);

        let request = self
            .build_request(ctx, method.clone(), url, body, &options)
            .map_err(|source| HttpError::Request {
                method: method.clone(),
                source,
            })?;

        let transport = self.transport_for(&options);
        tracing::debug!("Dispatching request via {:?}", transport);

        let transport_error = |source: TransportError| {
            tracing::warn!("Http transport error: {}", source);
            HttpError::Transport {
                method: method.clone(),
                source,
            }
        };

        let response = ctx
            .run(transport.send(request))
            .await
            .and_then(|sent| sent)
            .map_err(transport_error)?;

        let status = response.status();
        let status_line = response.status_line();

        let body = ctx
            .run(response.bytes())
            .await
            .and_then(|read| read)
            .map_err(transport_error)?;

        tracing::debug!(status, bytes = body.len(), "Received response");

        options.record_status(status);

        if !options.captures_status() && status >= 400 {
            return Err(HttpError::Status {
                status,
                message: status_line,
            });
        }

        let Some(result) = result else {
            return Ok(());
        };

        match self.unmarshal.unmarshal::<R>(&body) {
            Ok(value) => {
                *result = value;
                Ok(())
            }
            Err(err) if options.captures_status() && status >= 400 => {
                tracing::debug!("Ignoring undecodable {} response body: {}", status, err);
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Http Response error: {}", err);
                Err(HttpError::Decode(err))
            }
        }
    }

    fn build_request<B>(
        &self,
        ctx: &Context,
        method: Method,
        url: &str,
        body: Option<Payload<'_, B>>,
        options: &RequestOptions<'_>,
    ) -> Result<TransportRequest, RequestError>
    where
        B: Serialize + ?Sized,
    {
        let payload = match body {
            Some(body) => body
                .into_bytes(&self.marshal)
                .map_err(RequestError::Marshal)?,
            None => Vec::new(),
        };

        let url = Url::parse(url)?;

        let mut headers = HeaderMap::new();
        for (key, value) in options.headers() {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                RequestError::InvalidHeader {
                    name: key.to_string(),
                    reason: e.to_string(),
                }
            })?;
            let value =
                HeaderValue::from_str(value).map_err(|e| RequestError::InvalidHeader {
                    name: key.to_string(),
                    reason: e.to_string(),
                })?;
            let _ = headers.insert(name, value);
        }

        // POST and PATCH always carry JSON, even over a caller-supplied content type.
        if method == Method::POST || method == Method::PATCH {
            let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(TransportRequest {
            method,
            url,
            headers,
            body: payload,
            context: ctx.clone(),
        })
    }

    fn transport_for(&self, options: &RequestOptions<'_>) -> Arc<dyn Transport> {
        Arc::clone(options.transport().unwrap_or(&self.transport))
    }
}

/// Builder for an [`HttpClient`] with custom collaborators
pub struct HttpClientBuilder<M = JsonCodec, U = JsonCodec> {
    transport: Option<Arc<dyn Transport>>,
    marshal: M,
    unmarshal: U,
}

impl<M, U> fmt::Debug for HttpClientBuilder<M, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientBuilder")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            transport: None,
            marshal: JsonCodec,
            unmarshal: JsonCodec,
        }
    }
}

impl<M, U> HttpClientBuilder<M, U> {
    /// Dispatch requests through `transport`
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Dispatch requests through a shared transport
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Encode request bodies with `marshal`
    pub fn marshal<M2: Marshal>(self, marshal: M2) -> HttpClientBuilder<M2, U> {
        HttpClientBuilder {
            transport: self.transport,
            marshal,
            unmarshal: self.unmarshal,
        }
    }

    /// Decode response bodies with `unmarshal`
    pub fn unmarshal<U2: Unmarshal>(self, unmarshal: U2) -> HttpClientBuilder<M, U2> {
        HttpClientBuilder {
            transport: self.transport,
            marshal: self.marshal,
            unmarshal,
        }
    }

    /// Build the HTTP client
    ///
    /// Without an explicit transport the client gets its own [`ReqwestTransport`].
    pub fn build(self) -> HttpClient<M, U> {
        HttpClient {
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(ReqwestTransport::new()) as Arc<dyn Transport>),
            marshal: self.marshal,
            unmarshal: self.unmarshal,
        }
    }
}
