//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde_json::Value;

use crate::middleware::body::Rejection;

/// An incoming HTTP request, with its body already read and decoded by the
/// [body parser](crate::middleware::body).
///
/// A body the parser refused is carried as its [`Rejection`]; only handlers
/// that read [`json`](Request::json) ever see it.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) json: Result<Value, Rejection>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Assembles a request from its head, the raw body and its decoded form,
    /// as produced by [`body::read`](crate::middleware::body::read) and
    /// [`body::decode`](crate::middleware::body::decode).
    pub fn new(parts: http::request::Parts, body: Bytes, json: Result<Value, Rejection>) -> Self {
        Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            headers: parts.headers,
            body,
            json,
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }

    /// Raw body bytes as received.
    pub fn body(&self) -> &[u8] { &self.body }

    /// Decoded JSON payload, or why the body parser refused it.
    ///
    /// `{}` when the request carried no body or a non-JSON content type.
    pub fn json(&self) -> Result<&Value, &Rejection> { self.json.as_ref() }

    /// Case-insensitive header lookup. Non-UTF-8 values are skipped.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[cfg(test)]
impl Request {
    pub(crate) fn for_test(method: Method, uri: &str, json: Value) -> Self {
        let (parts, ()) = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        let body = Bytes::from(serde_json::to_vec(&json).unwrap());
        Self::new(parts, body, Ok(json))
    }

    pub(crate) fn refused_for_test(method: Method, uri: &str, rejection: Rejection) -> Self {
        let (parts, ()) = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        Self::new(parts, Bytes::new(), Err(rejection))
    }
}
