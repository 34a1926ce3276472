//! Route-tree walking: flattens a possibly nested router into the document's
//! path map.
//!
//! Paths are normalized exactly once, when a leaf is reached: wildcard mount
//! segments (`/*/`) collapse into a single `/` and a trailing slash is
//! trimmed. The output map is keyed by the normalized path, so downstream
//! path-parameter inference always sees the same string that appears in the
//! document.

use log::debug;

use crate::builder::DocBuilder;
use crate::document::{Methods, Paths};
use crate::operation::build_operation;
use crate::router::{RouteKind, Router, ANY_METHOD};

/// Walks `router` depth-first, building an operation per retained leaf verb.
pub fn walk(ctx: &mut DocBuilder, router: &Router, prefix: &str) -> Paths {
    let mut paths = Paths::new();
    for route in router.routes() {
        match &route.kind {
            RouteKind::Subtree(sub) => {
                let sub_prefix = format!("{}{}", prefix, route.pattern);
                for (path, methods) in walk(ctx, sub, &sub_prefix) {
                    paths.entry(path).or_default().extend(methods);
                }
            }
            RouteKind::Leaf(handlers) => {
                let path = normalize_path(&format!("{}{}", prefix, route.pattern));
                debug!("walking leaf {} ({} verbs)", path, handlers.len());
                let wildcard = handlers.get(ANY_METHOD);

                // Concrete verbs whose handler repeats the wildcard fallback
                // were auto-populated by the router; they are skipped, and
                // the wildcard is emitted under the sole duplicated verb when
                // there is exactly one.
                let duplicated: Vec<&str> = handlers
                    .iter()
                    .filter(|(m, h)| m.as_str() != ANY_METHOD && wildcard == Some(*h))
                    .map(|(m, _)| m.as_str())
                    .collect();

                let mut methods = Methods::new();
                for (method, handler) in handlers {
                    let verb = if method == ANY_METHOD {
                        match duplicated.as_slice() {
                            [only] => only.to_string(),
                            _ => ANY_METHOD.to_string(),
                        }
                    } else {
                        if duplicated.contains(&method.as_str()) {
                            continue;
                        }
                        method.clone()
                    };
                    let op = build_operation(
                        ctx,
                        handler.endpoint(),
                        &path,
                        &verb,
                        handlers.len(),
                    );
                    methods.insert(verb.to_lowercase(), op);
                }
                paths.entry(path).or_default().extend(methods);
            }
        }
    }
    paths
}

/// Collapses `/*/` sequences introduced by wildcard mount points and trims
/// the trailing slash. Normalization is idempotent.
pub fn normalize_path(path: &str) -> String {
    let mut path = path.to_string();
    while path.contains("/*/") {
        path = path.replace("/*/", "/");
    }
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}
