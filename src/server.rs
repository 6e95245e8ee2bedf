//! HTTP server and graceful shutdown.
//!
//! On SIGTERM or Ctrl-C the server:
//! 1. Stops accepting new connections.
//! 2. Lets every in-flight connection task run to completion.
//! 3. Returns from [`Server::serve`], so `main` can exit cleanly.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use hyper::body::Body;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{debug, error, info};

use crate::error::Error;
use crate::middleware::body::{self, BoxError};
use crate::middleware::trace;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// The HTTP server. Owns the listening socket; the route table is handed to
/// [`serve`](Server::serve).
pub struct Server {
    listener: TcpListener,
    body_limit: usize,
}

impl Server {
    /// Binds the listening socket.
    ///
    /// ```rust,no_run
    /// # async fn run() -> Result<(), ligado::Error> {
    /// let server = ligado::Server::bind("127.0.0.1:0").await?;
    /// println!("listening on {}", server.local_addr()?);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, body_limit: body::DEFAULT_LIMIT })
    }

    /// Maximum request body size in bytes. Larger bodies get `413`.
    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves `router` until SIGTERM or Ctrl-C, then drains in-flight
    /// connections.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Serves `router` until `signal` resolves, then drains in-flight
    /// connections.
    pub async fn serve_with_shutdown<S>(self, router: Router, signal: S) -> Result<(), Error>
    where
        S: Future<Output = ()>,
    {
        let Self { listener, body_limit } = self;
        let router = Arc::new(router);
        let addr = listener.local_addr()?;

        info!(%addr, routes = router.routes().len(), "ligado listening");

        let mut tasks = tokio::task::JoinSet::new();
        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Shutdown is checked first so a signal stops accepting
                // immediately, even with connections queued.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move {
                                let response = dispatch(&router, body_limit, peer, req).await;
                                Ok::<_, Infallible>(response.into_inner())
                            }
                        });

                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(%peer, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("ligado stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request and produces its one response. Every failure past this
/// point is a response (400, 404, 413, 500), never a connection error.
///
/// A refused body does not stop dispatch: it travels with the request and
/// only a handler that reads the JSON payload answers with the refusal.
async fn dispatch<B>(
    router: &Router,
    body_limit: usize,
    peer: SocketAddr,
    req: http::Request<B>,
) -> Response
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    trace::instrument(&method, &path, peer, async {
        let (parts, incoming) = req.into_parts();

        let (raw, json) = match body::read(incoming, body_limit).await {
            Ok(raw) => {
                let json = body::decode(&parts.headers, &raw);
                (raw, json)
            }
            Err(rejection) => (Bytes::new(), Err(rejection)),
        };
        if let Err(rejection) = &json {
            debug!("{rejection}");
        }

        router.call(Request::new(parts, raw, json)).await
    })
    .await
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM or SIGINT (Ctrl-C). On Windows only Ctrl-C
/// is available. A listener that cannot be installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};
    use http_body_util::Full;
    use serde_json::{Value, json};

    use super::*;
    use crate::routes;

    fn peer() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 40000))
    }

    async fn send(method: Method, uri: &str, content_type: Option<&str>, body: &'static [u8]) -> Response {
        let mut req = http::Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            req = req.header("content-type", ct);
        }
        let req = req.body(Full::new(Bytes::from_static(body))).unwrap();
        dispatch(&routes::router().unwrap(), 64, peer(), req).await
    }

    fn json_body(res: &Response) -> Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    #[tokio::test]
    async fn liveness_ignores_query_and_body() {
        let res = send(Method::GET, "/?x=1", Some("application/json"), b"{\"a\":1}").await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"Servidor ligado!");
    }

    #[tokio::test]
    async fn echo_round_trips_json() {
        for raw in [&b"{\"a\":1}"[..], b"[]", b"null", b"\"s\"", b"3"] {
            let res = send(Method::POST, "/test", Some("application/json"), raw).await;
            assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(json_body(&res), serde_json::from_slice::<Value>(raw).unwrap());
        }
    }

    #[tokio::test]
    async fn echo_without_json_body_returns_empty_object() {
        let res = send(Method::POST, "/test", None, b"").await;
        assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(&res), json!({}));

        let res = send(Method::POST, "/test", Some("text/plain"), b"hello").await;
        assert_eq!(json_body(&res), json!({}));
    }

    #[tokio::test]
    async fn malformed_json_is_refused_by_the_echo() {
        let res = send(Method::POST, "/test", Some("application/json"), b"{oops").await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn liveness_survives_a_malformed_body() {
        let res = send(Method::GET, "/", Some("application/json"), b"{oops").await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"Servidor ligado!");
    }

    #[tokio::test]
    async fn liveness_survives_an_oversize_body() {
        let res = send(Method::GET, "/", Some("application/json"), &[b' '; 65]).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"Servidor ligado!");
    }

    #[tokio::test]
    async fn unknown_route_with_bad_body_is_still_404() {
        let res = send(Method::GET, "/unknown", Some("application/json"), b"{oops").await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn oversize_body_is_rejected() {
        let res = send(Method::POST, "/test", Some("application/json"), &[b' '; 65]).await;
        assert_eq!(res.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let res = send(Method::GET, "/unknown", None, b"").await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(res.body(), b"Cannot GET /unknown");
    }
}
