//! Minimal routing-tree contract consumed by the document builder.
//!
//! The builder does not depend on any particular router implementation; it
//! only needs a tree of URL patterns whose leaves map HTTP verbs to opaque
//! handler references. [`Router`] is a plain data structure that callers
//! populate to mirror their real router's mount hierarchy.
//!
//! A handler reference is identified by a stable id string (typically the
//! handler's qualified function path). The id is what the
//! [`SourceIndex`](crate::source::SourceIndex) is keyed by, and what the
//! walker compares when deciding whether a concrete verb merely repeats the
//! leaf's wildcard fallback.

use std::collections::BTreeMap;

/// The wildcard verb: a fallback handler that applies to all verbs not
/// registered explicitly on the same leaf.
pub const ANY_METHOD: &str = "*";

/// An opaque reference to a request handler.
///
/// Two references are structurally equal when their ids are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handler {
    id: String,
}

impl Handler {
    /// Creates a handler reference with a stable identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The stable identifier this reference was created with.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A handler as it appears in the route tree: either a plain endpoint or a
/// middleware chain that exposes a distinguished terminal endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteHandler {
    Endpoint(Handler),
    Chain {
        middlewares: Vec<String>,
        endpoint: Handler,
    },
}

impl RouteHandler {
    /// Unwraps to the terminal endpoint, looking through a chain wrapper.
    pub fn endpoint(&self) -> &Handler {
        match self {
            RouteHandler::Endpoint(h) => h,
            RouteHandler::Chain { endpoint, .. } => endpoint,
        }
    }
}

impl From<Handler> for RouteHandler {
    fn from(h: Handler) -> Self {
        RouteHandler::Endpoint(h)
    }
}

/// One child of a routing-tree node.
#[derive(Debug, Clone)]
pub struct Route {
    /// URL pattern segment for this child, e.g. `/widgets/{id}` or `/admin/*`.
    pub pattern: String,
    pub kind: RouteKind,
}

/// What a route pattern points at: a leaf of verb handlers or a mounted
/// sub-router.
#[derive(Debug, Clone)]
pub enum RouteKind {
    /// Verb (uppercase, or [`ANY_METHOD`]) to handler. A `BTreeMap` so that
    /// walking iterates verbs in a deterministic sorted order.
    Leaf(BTreeMap<String, RouteHandler>),
    Subtree(Router),
}

/// A routing tree node.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for `method` under `pattern`. Registering another
    /// method under the same pattern merges into the existing leaf.
    pub fn handle(
        &mut self,
        pattern: impl Into<String>,
        method: &str,
        handler: impl Into<RouteHandler>,
    ) -> &mut Self {
        let pattern = pattern.into();
        let method = if method == ANY_METHOD {
            method.to_string()
        } else {
            method.to_uppercase()
        };
        if let Some(route) = self.routes.iter_mut().find(|r| r.pattern == pattern) {
            if let RouteKind::Leaf(methods) = &mut route.kind {
                methods.insert(method, handler.into());
                return self;
            }
        }
        let mut methods = BTreeMap::new();
        methods.insert(method, handler.into());
        self.routes.push(Route {
            pattern,
            kind: RouteKind::Leaf(methods),
        });
        self
    }

    /// Mounts a sub-router under `pattern`.
    pub fn mount(&mut self, pattern: impl Into<String>, sub: Router) -> &mut Self {
        self.routes.push(Route {
            pattern: pattern.into(),
            kind: RouteKind::Subtree(sub),
        });
        self
    }

    /// The immediate children of this node.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_merges_methods_on_same_pattern() {
        let mut router = Router::new();
        router.handle("/widgets", "get", Handler::new("list"));
        router.handle("/widgets", "POST", Handler::new("create"));

        assert_eq!(router.routes().len(), 1);
        match &router.routes()[0].kind {
            RouteKind::Leaf(methods) => {
                assert!(methods.contains_key("GET"));
                assert!(methods.contains_key("POST"));
            }
            RouteKind::Subtree(_) => panic!("expected a leaf"),
        }
    }

    #[test]
    fn test_chain_unwraps_to_terminal_endpoint() {
        let chained = RouteHandler::Chain {
            middlewares: vec!["auth".to_string()],
            endpoint: Handler::new("api.GetWidget"),
        };
        assert_eq!(chained.endpoint().id(), "api.GetWidget");
    }

    #[test]
    fn test_wildcard_method_is_not_uppercased() {
        let mut router = Router::new();
        router.handle("/ping", ANY_METHOD, Handler::new("ping"));
        match &router.routes()[0].kind {
            RouteKind::Leaf(methods) => assert!(methods.contains_key("*")),
            RouteKind::Subtree(_) => panic!("expected a leaf"),
        }
    }
}
