//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware, proxy handler)
//!     → request.rs (attach request ID)
//!     → proxy core (rewrite, gate, round trip)
//!     → response written back to the client
//! ```

pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::{HttpServer, ServerInitError};
