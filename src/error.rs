//! Unified error type.

use http::Method;
use thiserror::Error;

/// The error type returned by ligado's fallible operations.
///
/// Request-level failures (404, 400, 413, 500) are answered as HTTP
/// [`Response`](crate::Response) values and never surface here. This type
/// covers startup: an ambiguous or malformed route table, and socket errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A second handler was registered for an existing (method, path) pair.
    #[error("route `{method} {path}` is already registered")]
    RouteConflict { method: Method, path: String },

    #[error("invalid route `{path}`: {source}")]
    InvalidRoute {
        path: String,
        #[source]
        source: matchit::InsertError,
    },
}
