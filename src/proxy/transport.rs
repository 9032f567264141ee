//! Upstream transports.
//!
//! A [`Transport`] performs one HTTP round trip: request in, response or
//! error out. The gate wraps any transport, and tests substitute their
//! own; [`HttpTransport`] is the real one, backed by a pooled
//! hyper client that speaks both `http` and `https`.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use tower::BoxError;

use crate::config::TimeoutConfig;

/// One HTTP round trip.
///
/// Implementations must be safe for concurrent use; the server shares a
/// single transport across all in-flight requests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, BoxError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, BoxError> {
        (**self).round_trip(request).await
    }
}

/// Errors that can occur while building the network transport.
#[derive(Debug, Error)]
pub enum TransportInitError {
    /// The OS certificate store could not be read.
    #[error("Failed to load native TLS roots: {0}")]
    NativeRoots(#[from] std::io::Error),
}

/// Network transport over a pooled hyper client.
pub struct HttpTransport {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl HttpTransport {
    /// Build the transport, applying connect and pool-idle timeouts.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, TransportInitError> {
        // Install the rustls crypto provider exactly once per process.
        // An Err from install_default means a provider is already in
        // place, which is fine.
        static RUSTLS_INIT: OnceLock<()> = OnceLock::new();
        RUSTLS_INIT.get_or_init(|| {
            let _ = rustls::crypto::ring::default_provider().install_default();
        });

        let mut http_connector = HttpConnector::new();
        // The wrapped connector must accept https URIs; the rustls layer
        // decides which connections actually get TLS.
        http_connector.enforce_http(false);
        http_connector.set_nodelay(true);
        http_connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let https_connector = HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .wrap_connector(http_connector);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
            .build(https_connector);

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, BoxError> {
        let response = self.client.request(request).await?;
        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
