//! Local response synthesis.
//!
//! Responses built here never come from the network: the gate uses them
//! to answer denied requests directly. A synthesized response carries
//! exactly one `Content-Type`, a `Content-Length` equal to the body's
//! byte length, and the originating request's `Transfer-Encoding` values.

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Response, StatusCode};

/// Content type for synthesized plain-text responses.
pub const TEXT_PLAIN: &str = "text/plain";

/// Build a response locally for the given request.
///
/// `content_type` must be a valid header value (callers pass constants
/// such as [`TEXT_PLAIN`]). The body is single-use; every call produces
/// a fresh one.
pub fn synthesize<B>(
    request: &Request<B>,
    content_type: &'static str,
    status: StatusCode,
    body: &str,
) -> Response<Body> {
    let mut response = Response::new(Body::from(body.to_owned()));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    for value in request.headers().get_all(header::TRANSFER_ENCODING) {
        headers.append(header::TRANSFER_ENCODING, value.clone());
    }

    response
}

/// The canonical denial: `401 Unauthorized`, `text/plain`, empty body.
pub fn unauthorized<B>(request: &Request<B>) -> Response<Body> {
    synthesize(request, TEXT_PLAIN, StatusCode::UNAUTHORIZED, "")
}
