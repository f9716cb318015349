//! Process-wide default client
//!
//! The free functions in this module delegate to a single [`HttpClient`]
//! with no overrides, created the first time it is used.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::HttpClient;
use crate::context::Context;
use crate::options::RequestOption;
use crate::request::Payload;
use crate::response::Response;

static DEFAULT_CLIENT: Lazy<HttpClient> = Lazy::new(HttpClient::new);

/// The shared default client
pub fn default_client() -> &'static HttpClient {
    &DEFAULT_CLIENT
}

/// GET request using the default client
pub async fn get<'a, R>(
    ctx: &Context,
    url: &str,
    result: Option<&mut R>,
    options: impl IntoIterator<Item = RequestOption<'a>>,
) -> Response<()>
where
    R: DeserializeOwned,
{
    default_client().get(ctx, url, result, options).await
}

/// POST request using the default client
pub async fn post<'a, B, R>(
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
    default_client().post(ctx, url, body, result, options).await
}

/// PUT request using the default client
pub async fn put<'a, B, R>(
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
    default_client().put(ctx, url, body, result, options).await
}

/// PATCH request using the default client
pub async fn patch<'a, B, R>(
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
    default_client().patch(ctx, url, body, result, options).await
}

/// DELETE request using the default client
pub async fn delete<'a, R>(
    ctx: &Context,
    url: &str,
    result: Option<&mut R>,
    options: impl IntoIterator<Item = RequestOption<'a>>,
) -> Response<()>
where
    R: DeserializeOwned,
{
    default_client().delete(ctx, url, result, options).await
}
