//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     SIGINT received → broadcast fires → stop accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task holds a receiver
//! - The server finishes in-flight requests before exiting

pub mod shutdown;

pub use shutdown::Shutdown;
