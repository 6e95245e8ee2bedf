//! Route table and dispatch.
//!
//! The table is an ordered list of [`Route`]s, built once at startup. Lookup
//! goes through one `matchit` radix tree per method, each mapping a path to
//! the index of its route in the table.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::error::Error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The future a [`Handler`] resolves to, boxed so one table can hold them all.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A route handler: any `async fn(Request) -> impl IntoResponse`.
///
/// Stored in the table as `Box<dyn Handler>`.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: Request) -> BoxFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: IntoResponse,
{
    fn handle(&self, req: Request) -> BoxFuture {
        let fut = self(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// One (method, path, handler) binding. Immutable once registered.
pub struct Route {
    method: Method,
    path: String,
    handler: Box<dyn Handler>,
}

impl Route {
    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// The application router.
///
/// Registration either extends the table or fails with an [`Error`], so an
/// ambiguous table never reaches [`Server::serve`](crate::Server::serve):
///
/// ```rust
/// # use ligado::{Method, Request, Response, Router};
/// # async fn get_user(_: Request) -> Response { Response::text("") }
/// # async fn create_user(_: Request) -> Response { Response::text("") }
/// # fn main() -> Result<(), ligado::Error> {
/// let app = Router::new()
///     .on(Method::GET,  "/users/{id}", get_user)?
///     .on(Method::POST, "/users",      create_user)?;
///
/// assert_eq!(app.routes().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Router {
    table: Vec<Route>,
    trees: HashMap<Method, MatchitRouter<usize>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` + `path`.
    ///
    /// Fails with [`Error::RouteConflict`] if the pair is already taken and
    /// with [`Error::InvalidRoute`] if `path` is not a valid pattern. Path
    /// parameters use `{name}` syntax.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Result<Self, Error> {
        if self.table.iter().any(|r| r.method == method && r.path == path) {
            return Err(Error::RouteConflict { method, path: path.to_owned() });
        }

        let index = self.table.len();
        self.trees
            .entry(method.clone())
            .or_default()
            .insert(path, index)
            .map_err(|source| Error::InvalidRoute { path: path.to_owned(), source })?;

        debug!(%method, path, "route registered");
        self.table.push(Route {
            method,
            path: path.to_owned(),
            handler: Box::new(handler),
        });
        Ok(self)
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Result<Self, Error> {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Result<Self, Error> {
        self.on(Method::POST, path, handler)
    }

    /// The registered routes, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.table
    }

    /// Dispatches `req` to the matching route.
    ///
    /// Unmatched requests get `404 Not Found`. `HEAD` falls back to the `GET`
    /// route of the same path when no `HEAD` route exists.
    pub async fn call(&self, mut req: Request) -> Response {
        let Some((route, params)) = self.lookup(&req.method, &req.path) else {
            return not_found(&req);
        };
        req.params = params;
        route.handler.handle(req).await
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(&Route, HashMap<String, String>)> {
        let found = self.find(method, path);
        if found.is_none() && *method == Method::HEAD {
            return self.find(&Method::GET, path);
        }
        found
    }

    fn find(&self, method: &Method, path: &str) -> Option<(&Route, HashMap<String, String>)> {
        let matched = self.trees.get(method)?.at(path).ok()?;
        let route = &self.table[*matched.value];
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((route, params))
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table)
            .finish_non_exhaustive()
    }
}

fn not_found(req: &Request) -> Response {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .text(format!("Cannot {} {}", req.method, req.path))
}
