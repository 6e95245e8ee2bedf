//! Middleware layer.
//!
//! The steps the server runs around every dispatch, in order:
//!
//! - [`trace`] opens a per-request span and logs status and latency
//! - [`body`] reads the body under a size limit and decodes JSON payloads
//!
//! Both are applied by [`Server`](crate::Server); the functions are public so
//! an embedding host can run the same steps in front of [`Router::call`](crate::Router::call).

pub mod body;
pub mod trace;
