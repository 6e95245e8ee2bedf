//! Per-request tracing.

use std::future::Future;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use http::Method;
use tracing::{Instrument, info, info_span};

use crate::response::Response;

/// Runs `handle` inside a `request` span and logs the outcome.
pub async fn instrument<F>(method: &Method, path: &str, peer: SocketAddr, handle: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("request", %method, path, %peer);
    let start = Instant::now();

    let response = handle.instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = response.status_code().as_u16(),
            latency_us = micros(start.elapsed()),
            "request completed",
        );
    });
    response
}

/// Whole microseconds, saturating at `u64::MAX`.
fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}
