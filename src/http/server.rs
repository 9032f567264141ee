//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Assemble the proxy: target, director, authenticator, gate, transport
//! - Create the Axum Router and wire up middleware (timeout, request ID,
//!   tracing)
//! - Mount the proxy handler at the configured route path
//! - Serve connections until shutdown is signalled
//! - Map upstream transport failures to 502

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth;
use crate::config::ProxyConfig;
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::observability::metrics;
use crate::proxy::{AuthGate, Director, HttpTransport, Target, TargetError, Transport, TransportInitError};

/// Errors that can occur while assembling the server.
#[derive(Debug, Error)]
pub enum ServerInitError {
    /// The configured upstream URL is unusable.
    #[error("Invalid upstream target: {0}")]
    Target(#[from] TargetError),

    /// The network transport could not be built.
    #[error("Failed to initialize upstream transport: {0}")]
    Transport(#[from] TransportInitError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub director: Director,
    pub transport: Arc<dyn Transport>,
}

/// HTTP server for the authenticating proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Assemble the proxy from configuration.
    ///
    /// This is the composition root: the director is pointed at the
    /// parsed target, the configured authenticator gates the network
    /// transport, and the handler is mounted at the route path.
    pub fn new(config: &ProxyConfig) -> Result<Self, ServerInitError> {
        let target = Target::parse(&config.upstream.url)?;
        tracing::info!(target = %target, mode = ?config.auth.mode, "Proxy assembled");

        let director = Director::new(target);
        let authenticator = auth::from_config(&config.auth);
        let transport = HttpTransport::new(&config.timeouts)?;
        let gate = AuthGate::new(authenticator, transport);

        let state = AppState {
            director,
            transport: Arc::new(gate),
        };

        Ok(Self {
            router: Self::build_router(config, state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mount = config.route.path.trim_end_matches('/');

        let router = if mount.is_empty() {
            Router::new()
                .route("/{*path}", any(proxy_handler))
                .route("/", any(proxy_handler))
        } else {
            Router::new()
                .route(mount, any(proxy_handler))
                .route(&format!("{mount}/{{*path}}"), any(proxy_handler))
        };

        router
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Rewrites the request toward the target, hands it to the gate, and
/// writes back whatever comes out.
async fn proxy_handler(
    State(state): State<AppState>,
    mut request: Request<Body>,
) -> impl IntoResponse {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().to_string();
    let inbound_path = request.uri().path().to_string();

    state.director.rewrite(&mut request);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %inbound_path,
        upstream = %request.uri(),
        "Proxying request"
    );

    match state.transport.round_trip(request).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), start_time);
            response.into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_upstream_error();
            metrics::record_request(&method, 502, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
