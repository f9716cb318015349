//! Request payloads

use serde::Serialize;

use crate::codec::Marshal;
use crate::error::CodecError;

/// Request body of a POST, PUT or PATCH call
#[derive(Debug)]
pub enum Payload<'a, T: ?Sized = ()> {
    /// A value encoded by the client's marshal collaborator
    Json(&'a T),
    /// Wire-ready bytes sent unmodified
    Raw(Vec<u8>),
}

impl<T: ?Sized> Clone for Payload<'_, T> {
    fn clone(&self) -> Self {
        match self {
            Payload::Json(value) => Payload::Json(value),
            Payload::Raw(bytes) => Payload::Raw(bytes.clone()),
        }
    }
}

impl Payload<'static, ()> {
    /// Raw payload that bypasses the marshal collaborator
    pub fn raw(bytes: impl Into<Vec<u8>>) -> Self {
        Payload::Raw(bytes.into())
    }
}

impl<'a, T: ?Sized> From<&'a T> for Payload<'a, T> {
    fn from(value: &'a T) -> Self {
        Payload::Json(value)
    }
}

impl<T> Payload<'_, T>
where
    T: Serialize + ?Sized,
{
    pub(crate) fn into_bytes<M: Marshal>(self, marshal: &M) -> Result<Vec<u8>, CodecError> {
        match self {
            Payload::Json(value) => marshal.marshal(value),
            Payload::Raw(bytes) => Ok(bytes),
        }
    }
}
