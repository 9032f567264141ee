//! Proxy core: target, director, gate, transports.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → director.rs (URI rewritten toward the target)
//!     → auth_gate.rs (authenticator consulted)
//!         ├─ pass → transport.rs (network round trip) → upstream response
//!         └─ fail → response.rs (local 401, no network I/O)
//! ```
//!
//! # Design Decisions
//! - The gate wraps the transport, so a denied request provably does no
//!   network work and an allowed one returns the transport's result
//!   object unmodified
//! - Exactly one of {delegated round trip, synthesized denial} happens
//!   per request
//! - The target is parsed once at startup; the request path never parses
//!   URLs

pub mod auth_gate;
pub mod director;
pub mod response;
pub mod target;
pub mod transport;

pub use auth_gate::AuthGate;
pub use director::Director;
pub use target::{Target, TargetError};
pub use transport::{HttpTransport, Transport, TransportInitError};
