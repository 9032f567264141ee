//! Authentication predicates.
//!
//! # Responsibilities
//! - Decide, per request, whether the gate may forward it
//! - Stay pure: no I/O, no mutation, no per-request state
//!
//! # Design Decisions
//! - The gate is predicate-agnostic; strategies are swapped via config
//! - Denying is the default posture: the reference predicate rejects
//!   every request, including well-formed credentials

use axum::body::Body;
use axum::http::{header, Request};

use crate::config::{AuthConfig, AuthMode};

/// Trait for deciding whether a request may be forwarded.
pub trait Authenticator: Send + Sync + std::fmt::Debug {
    /// Returns true if the request is allowed through the gate.
    fn authenticate(&self, request: &Request<Body>) -> bool;
}

/// Rejects every request. The reference predicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Authenticator for DenyAll {
    fn authenticate(&self, _request: &Request<Body>) -> bool {
        false
    }
}

/// Admits every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authenticator for AllowAll {
    fn authenticate(&self, _request: &Request<Body>) -> bool {
        true
    }
}

/// Admits requests carrying `Authorization: Bearer <token>` with the
/// configured token.
#[derive(Debug, Clone)]
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Authenticator for BearerToken {
    fn authenticate(&self, request: &Request<Body>) -> bool {
        request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|candidate| candidate == self.token)
            .unwrap_or(false)
    }
}

/// Select the authenticator named by the configuration.
pub fn from_config(config: &AuthConfig) -> std::sync::Arc<dyn Authenticator> {
    match config.mode {
        AuthMode::Deny => std::sync::Arc::new(DenyAll),
        AuthMode::Allow => std::sync::Arc::new(AllowAll),
        AuthMode::Bearer => std::sync::Arc::new(BearerToken::new(config.bearer_token.clone())),
    }
}
