//! Body encoding and decoding collaborators

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

/// Turns a request value into wire bytes
///
/// Custom implementations can be installed with [`crate::HttpClientBuilder::marshal`].
pub trait Marshal: Send + Sync {
    /// Encode `value` into the request payload
    fn marshal<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized;
}

/// Turns response bytes into a value
///
/// Custom implementations can be installed with [`crate::HttpClientBuilder::unmarshal`].
pub trait Unmarshal: Send + Sync {
    /// Decode `data` into a `T`
    fn unmarshal<T>(&self, data: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned;
}

/// Default codec backed by `serde_json`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl Marshal for JsonCodec {
    fn marshal<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_vec(value).map_err(CodecError::from)
    }
}

impl Unmarshal for JsonCodec {
    fn unmarshal<T>(&self, data: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(data).map_err(CodecError::from)
    }
}
