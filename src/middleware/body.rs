//! JSON body parser.
//!
//! Bodies are read whole, up to a limit, before the handler runs. A body is
//! decoded only when it is non-empty and declared as JSON; anything else
//! decodes to an empty object. A refusal is handed to the handler with the
//! request rather than answered here, so routes that ignore the body are not
//! affected by it.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::response::{IntoResponse, Response};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Default maximum body size: 100 KiB.
pub const DEFAULT_LIMIT: usize = 100 * 1024;

/// Why the body parser refused a request body.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("malformed JSON body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to read request body: {0}")]
    Read(BoxError),
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Malformed(_) | Self::Read(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        Response::builder().status(self.status()).text(self.to_string())
    }
}

/// Collects `body` into memory, refusing anything over `limit` bytes.
pub async fn read<B>(body: B, limit: usize) -> Result<Bytes, Rejection>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(Rejection::TooLarge { limit }),
        Err(e) => Err(Rejection::Read(e)),
    }
}

/// Decodes `raw` as any JSON value when `headers` declare a JSON content
/// type. Empty or non-JSON bodies decode to `{}`.
pub fn decode(headers: &HeaderMap, raw: &[u8]) -> Result<Value, Rejection> {
    if raw.is_empty() || !is_json(headers) {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_slice(raw)?)
}

/// `application/json` or any `application/*+json`, parameters ignored.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
