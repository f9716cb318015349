//! JSON request/response layer over a pluggable HTTP transport
//!
//! [`HttpClient`] builds a request from a verb, a URL, an optional body and
//! a list of per-call options, dispatches it through a [`Transport`] and
//! decodes the JSON response into a caller-provided result.
//!
//! Responses with a status of 400 or above fail with [`HttpError::Status`]
//! unless the caller asked to observe the status with [`with_status`]. In
//! that case the status is recorded and a body that does not decode is
//! tolerated.
//!
//! # Example
//!
//! ```no_run
//! use json_http::{with_header, with_status, Context, HttpClient};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct Pokemon {
//!     id: u32,
//!     name: String,
//! }
//!
//! async fn example() -> Result<(), json_http::HttpError> {
//!     let client = HttpClient::new();
//!     let ctx = Context::background();
//!
//!     let mut pokemon = Pokemon::default();
//!     let mut status = 0;
//!     client
//!         .get(
//!             &ctx,
//!             "https://pokeapi.co/api/v2/pokemon/pikachu",
//!             Some(&mut pokemon),
//!             [
//!                 with_header("User-Agent", "json-http/0.1"),
//!                 with_status(&mut status),
//!             ],
//!         )
//!         .await?;
//!
//!     if status == 404 {
//!         // not found
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod codec;
mod context;
pub mod default_client;
mod error;
mod options;
mod request;
mod response;
mod transport;

pub use client::{HttpClient, HttpClientBuilder};
pub use codec::{JsonCodec, Marshal, Unmarshal};
pub use context::Context;
pub use default_client::{default_client, delete, get, patch, post, put};
pub use error::{CodecError, HttpError, RequestError, TransportError};
pub use options::{
    with_header, with_headers, with_status, with_transport, RequestOption, RequestOptions,
};
pub use request::Payload;
pub use response::Response;
pub use tokio_util::sync::CancellationToken;
pub use transport::{
    ReqwestTransport, ReqwestTransportBuilder, ResponseBody, Transport, TransportRequest,
    TransportResponse,
};
