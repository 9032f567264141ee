//! Authentication subsystem.

pub mod authenticator;

pub use authenticator::{from_config, AllowAll, Authenticator, BearerToken, DenyAll};
