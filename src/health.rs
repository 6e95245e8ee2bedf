//! Liveness handler.
//!
//! Mounted at `GET /`. If the process can answer HTTP at all, it is up, so
//! the handler has no dependencies and cannot fail.

use crate::{Request, Response};

/// Body sent by [`liveness`].
pub const LIVENESS_MESSAGE: &str = "Servidor ligado!";

/// Always `200 OK` with body [`LIVENESS_MESSAGE`], whatever the request carries.
pub async fn liveness(_req: Request) -> Response {
    Response::text(LIVENESS_MESSAGE)
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn answers_200_with_fixed_text() {
        let res = liveness(Request::for_test(Method::GET, "/?probe=1", json!({}))).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), LIVENESS_MESSAGE.as_bytes());
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
    }

    #[tokio::test]
    async fn ignores_the_request_body() {
        for body in [json!(null), json!({"a": 1}), json!([1, 2])] {
            let res = liveness(Request::for_test(Method::GET, "/", body)).await;
            assert_eq!(res.status_code(), StatusCode::OK);
            assert_eq!(res.body(), b"Servidor ligado!");
        }
    }
}
