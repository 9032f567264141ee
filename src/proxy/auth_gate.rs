//! The authenticating gate.
//!
//! `AuthGate` sits between the proxy handler and the network transport.
//! Every round trip is first put to an [`Authenticator`]; requests that
//! pass are delegated to the wrapped transport and its result is
//! returned untouched, errors included. Requests that fail are answered
//! locally with the canonical `401` denial. Denied requests never reach
//! the network.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use tower::BoxError;

use crate::auth::Authenticator;
use crate::observability::metrics;
use crate::proxy::response;
use crate::proxy::transport::Transport;

/// A [`Transport`] that interposes an authentication check.
///
/// The gate keeps no per-request state; one instance serves all
/// in-flight requests concurrently.
pub struct AuthGate<T> {
    authenticator: Arc<dyn Authenticator>,
    upstream: T,
}

impl<T: Transport> AuthGate<T> {
    pub fn new(authenticator: Arc<dyn Authenticator>, upstream: T) -> Self {
        Self {
            authenticator,
            upstream,
        }
    }
}

#[async_trait]
impl<T: Transport> Transport for AuthGate<T> {
    async fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, BoxError> {
        if self.authenticator.authenticate(&request) {
            return self.upstream.round_trip(request).await;
        }

        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            "Request denied by authenticator"
        );
        metrics::record_denied();

        // Denial is a successful local answer, not a transport error.
        Ok(response::unauthorized(&request))
    }
}
