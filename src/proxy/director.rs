//! Request URI rewriting.
//!
//! The director points an inbound request at the configured upstream
//! target. It rewrites only the URI: scheme, authority and path are
//! replaced with the target's, and the target's fixed query is merged
//! with the request's own. Method, headers and body pass through
//! untouched.

use std::mem;

use axum::http::uri::PathAndQuery;
use axum::http::{Request, Uri};

use crate::proxy::target::Target;

/// Rewrites inbound request URIs toward a fixed [`Target`].
///
/// Rewriting is deterministic: the same inbound URI always produces the
/// same rewritten URI. The director holds no mutable state and is safe
/// to share across concurrent requests.
#[derive(Debug, Clone)]
pub struct Director {
    target: Target,
}

impl Director {
    pub fn new(target: Target) -> Self {
        Self { target }
    }

    /// Rewrite a request in place. Only the URI changes.
    pub fn rewrite<B>(&self, request: &mut Request<B>) {
        let uri = mem::take(request.uri_mut());
        *request.uri_mut() = self.rewrite_uri(uri);
    }

    /// Rewrite a single URI toward the target.
    ///
    /// The inbound path is replaced, not appended: a request for
    /// `/search?q=cats` against a target of `http://host/api?key=abc`
    /// becomes `http://host/api?key=abc&q=cats`.
    pub fn rewrite_uri(&self, uri: Uri) -> Uri {
        let mut parts = uri.into_parts();

        let inbound_query = parts
            .path_and_query
            .as_ref()
            .and_then(PathAndQuery::query)
            .unwrap_or("");
        let merged = merge_queries(self.target.query(), inbound_query);

        let path_and_query = if merged.is_empty() {
            self.target.path().to_string()
        } else {
            format!("{}?{}", self.target.path(), merged)
        };

        parts.scheme = Some(self.target.scheme().clone());
        parts.authority = Some(self.target.authority().clone());
        // The target path starts with '/' and both query halves came out
        // of already-parsed URIs, so reassembly cannot fail.
        parts.path_and_query = Some(
            path_and_query
                .parse()
                .expect("target path and merged query form a valid path-and-query"),
        );

        Uri::from_parts(parts).expect("scheme, authority and path are all present")
    }
}

/// Merge the target's fixed query with an inbound query.
///
/// When either side is empty the result is plain concatenation (i.e. the
/// other side, or nothing). When both are present they are joined with a
/// single `&`, fixed query first.
fn merge_queries(fixed: &str, inbound: &str) -> String {
    if fixed.is_empty() || inbound.is_empty() {
        format!("{}{}", fixed, inbound)
    } else {
        format!("{}&{}", fixed, inbound)
    }
}
