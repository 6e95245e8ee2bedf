//! The service's route table.

use http::Method;

use crate::error::Error;
use crate::router::Router;
use crate::{echo, health};

/// Builds the table served by the `ligado` binary:
///
/// | Method | Path    | Handler                  |
/// |--------|---------|--------------------------|
/// | GET    | `/`     | [`health::liveness`]     |
/// | POST   | `/test` | [`echo::unauthorized`]   |
///
/// Call once at startup; an error here must abort the process before it binds.
pub fn router() -> Result<Router, Error> {
    Router::new()
        .on(Method::GET, "/", health::liveness)?
        .on(Method::POST, "/test", echo::unauthorized)
}
