//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! proxy handler + gate produce:
//!     → tracing events (structured log lines)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Metrics are cheap (atomic increments); the recording helpers work
//!   without an installed exporter, so unit tests need no setup
//! - Request ID flows through log lines via the request-id layer

pub mod metrics;
