//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check cross-field requirements (bearer mode needs a token)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::{AuthMode, ProxyConfig};
use crate::proxy::Target;

/// A single semantic problem found in a configuration.
#[derive(Debug)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidTargetUrl(String),
    InvalidRoutePath(String),
    MissingBearerToken,
    ZeroTimeout(&'static str),
    InvalidMetricsAddress(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address {:?} is not a valid socket address", addr)
            }
            ValidationError::InvalidTargetUrl(reason) => {
                write!(f, "upstream.url is not a usable target: {}", reason)
            }
            ValidationError::InvalidRoutePath(path) => {
                write!(f, "route.path {:?} must start with '/'", path)
            }
            ValidationError::MissingBearerToken => {
                write!(f, "auth.mode = \"bearer\" requires a non-empty auth.bearer_token")
            }
            ValidationError::ZeroTimeout(field) => {
                write!(f, "timeouts.{} must be greater than zero", field)
            }
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(
                    f,
                    "observability.metrics_address {:?} is not a valid socket address",
                    addr
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Err(e) = Target::parse(&config.upstream.url) {
        errors.push(ValidationError::InvalidTargetUrl(e.to_string()));
    }

    if !config.route.path.starts_with('/') {
        errors.push(ValidationError::InvalidRoutePath(config.route.path.clone()));
    }

    if config.auth.mode == AuthMode::Bearer && config.auth.bearer_token.is_empty() {
        errors.push(ValidationError::MissingBearerToken);
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
