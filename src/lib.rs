//! # ligado
//!
//! A minimal HTTP surface with two routes:
//!
//! | Method | Path    | Status | Body |
//! |---|---|---|---|
//! | `GET`  | `/`     | 200 | `Servidor ligado!` |
//! | `POST` | `/test` | 401 | the JSON request body, echoed |
//!
//! Everything else answers `404`.
//!
//! The pieces are usable on their own: a [`Router`] that rejects ambiguous
//! tables at registration, handlers as plain `async fn`s, and a small
//! hyper-based [`Server`] with a JSON body parser and graceful shutdown.
//!
//! ```rust,no_run
//! use ligado::{Server, routes};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ligado::Error> {
//!     let app = routes::router()?;
//!     Server::bind("0.0.0.0:3000").await?.serve(app).await
//! }
//! ```

mod error;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod echo;
pub mod health;
pub mod middleware;
pub mod routes;

pub use error::Error;
pub use http::{Method, StatusCode};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{BoxFuture, Handler, Route, Router};
pub use server::Server;
