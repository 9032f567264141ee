//! Upstream target definition.
//!
//! A [`Target`] is the parsed, immutable form of the `upstream.url` config
//! value. It is constructed once at startup; requests never trigger URL
//! parsing.

use std::fmt;
use std::str::FromStr;

use axum::http::uri::{Authority, Scheme};
use thiserror::Error;
use url::{Position, Url};

/// Errors that can occur while parsing a target URL.
#[derive(Debug, Error)]
pub enum TargetError {
    /// The URL itself did not parse.
    #[error("Invalid target URL: {0}")]
    Url(#[from] url::ParseError),

    /// The URL parsed, but its scheme is not proxyable.
    #[error("Unsupported target scheme {0:?} (expected \"http\" or \"https\")")]
    UnsupportedScheme(String),

    /// The host/port portion is not a valid HTTP authority.
    #[error("Invalid target authority: {0}")]
    Authority(#[from] axum::http::uri::InvalidUri),
}

/// A fixed upstream address: scheme, authority, path and raw query.
///
/// Rewritten requests adopt the scheme, authority and path verbatim; the
/// query is merged with each inbound request's query. The path always
/// begins with `/` (a bare `http://host` target parses with path `/`).
#[derive(Debug, Clone)]
pub struct Target {
    scheme: Scheme,
    authority: Authority,
    path: String,
    query: String,
}

impl Target {
    /// Parse a target from a URL string.
    ///
    /// Only `http` and `https` targets are accepted. Fragments are
    /// discarded; userinfo is not carried into the authority.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let url = Url::parse(raw)?;

        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => return Err(TargetError::UnsupportedScheme(other.to_string())),
        };

        // Slice host:port out of the serialized URL rather than rebuilding
        // it from pieces; this keeps IPv6 brackets intact.
        let authority = Authority::from_str(&url[Position::BeforeHost..Position::AfterPort])?;

        Ok(Self {
            scheme,
            authority,
            path: url.path().to_string(),
            query: url.query().unwrap_or("").to_string(),
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The fixed query string, without a leading `?`. Empty when the
    /// target URL carried no query.
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        Ok(())
    }
}
