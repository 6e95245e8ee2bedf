//! Echo handler mounted at `POST /test`.

use http::StatusCode;

use crate::response::IntoResponse;
use crate::{Request, Response};

/// Sends the decoded request body back as JSON with `401 Unauthorized`.
///
/// The status is fixed regardless of the payload. The body is neither logged
/// nor stored. A body the parser refused is answered with the parser's
/// status (400 or 413) instead.
pub async fn unauthorized(req: Request) -> Response {
    match req.json {
        Ok(payload) => Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .json(&payload),
        Err(rejection) => rejection.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use http::Method;
    use serde_json::{Value, json};

    use super::*;
    use crate::middleware::body::Rejection;

    async fn echo(payload: Value) -> (StatusCode, Value) {
        let res = unauthorized(Request::for_test(Method::POST, "/test", payload)).await;
        assert_eq!(res.header("content-type"), Some("application/json"));
        (res.status_code(), serde_json::from_slice(res.body()).unwrap())
    }

    #[tokio::test]
    async fn echoes_any_shape_with_401() {
        let payloads = [
            json!({"a": 1}),
            json!([]),
            json!(null),
            json!("text"),
            json!(42.5),
            json!({"nested": {"list": [true, false, null], "n": -1}}),
        ];
        for payload in payloads {
            let (status, body) = echo(payload.clone()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, payload);
        }
    }

    #[tokio::test]
    async fn repeated_calls_are_identical() {
        let first = echo(json!({"a": 1})).await;
        for _ in 0..5 {
            assert_eq!(echo(json!({"a": 1})).await, first);
        }
    }

    #[tokio::test]
    async fn refused_body_answers_with_the_parser_status() {
        let malformed = serde_json::from_slice::<Value>(b"{oops").unwrap_err();
        let req = Request::refused_for_test(Method::POST, "/test", Rejection::Malformed(malformed));
        assert_eq!(unauthorized(req).await.status_code(), StatusCode::BAD_REQUEST);

        let req = Request::refused_for_test(Method::POST, "/test", Rejection::TooLarge { limit: 8 });
        assert_eq!(unauthorized(req).await.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
