//! Route table recorded alongside the axum router.
//!
//! Axum does not expose its routes once they are mounted, so [`DocumentedRouter`] keeps a
//! parallel list of every registration. The resulting [`RouteTable`] is frozen when the router
//! is finalized and only read afterwards.

use std::sync::Arc;

use axum::{
    Router,
    handler::Handler,
    http::Method,
    routing::{self, MethodRouter},
};

use super::descriptor::HandlerDescriptor;

/// One registered route binding.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// HTTP method the handler answers.
    pub method: Method,
    /// Full path, including nesting prefixes.
    pub path: String,
    /// Handler signature, when the handler was registered with one.
    pub handler: Option<Arc<HandlerDescriptor>>,
}

/// Ordered, read-only list of routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build a table from explicit entries.
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    /// Number of recorded routes.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }
}

/// Axum router that records each route it mounts.
pub struct DocumentedRouter<S = ()> {
    router: Router<S>,
    entries: Vec<RouteEntry>,
}

impl<S> Default for DocumentedRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> DocumentedRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Create an empty router.
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            entries: Vec::new(),
        }
    }

    /// Mount a `GET` handler at `path`.
    pub fn get<H, T>(self, path: &str, handler: H, descriptor: Option<HandlerDescriptor>) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.mount(path, Method::GET, routing::get(handler), descriptor)
    }

    /// Mount a `POST` handler at `path`.
    pub fn post<H, T>(self, path: &str, handler: H, descriptor: Option<HandlerDescriptor>) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.mount(path, Method::POST, routing::post(handler), descriptor)
    }

    fn mount(
        mut self,
        path: &str,
        method: Method,
        method_router: MethodRouter<S>,
        handler: Option<HandlerDescriptor>,
    ) -> Self {
        self.router = self.router.route(path, method_router);
        self.entries.push(RouteEntry {
            method,
            path: path.to_string(),
            handler: handler.map(Arc::new),
        });
        self
    }

    /// Nest another documented router under `prefix`.
    pub fn nest(mut self, prefix: &str, other: DocumentedRouter<S>) -> Self {
        let prefix = prefix.trim_end_matches('/');
        self.entries
            .extend(other.entries.into_iter().map(|entry| RouteEntry {
                path: join_path(prefix, &entry.path),
                ..entry
            }));
        self.router = self.router.nest(prefix, other.router);
        self
    }

    /// Split into the axum router and the frozen route table.
    pub fn into_parts(self) -> (Router<S>, RouteTable) {
        (self.router, RouteTable::new(self.entries))
    }
}

fn join_path(prefix: &str, path: &str) -> String {
    match path {
        "" | "/" if !prefix.is_empty() => prefix.to_string(),
        _ => format!("{prefix}{path}"),
    }
}
