//! Permissive cross-origin headers for local frontend development.

use crate::http::response::{Response, ResponseBuilder, StatusCode};

pub const ALLOW_ORIGIN: (&str, &str) = ("Access-Control-Allow-Origin", "*");
pub const ALLOW_METHODS: (&str, &str) = ("Access-Control-Allow-Methods", "GET, POST, OPTIONS");
pub const ALLOW_HEADERS: (&str, &str) = ("Access-Control-Allow-Headers", "Content-Type, Authorization");

/// Adds the CORS headers to any response, errors included.
pub fn apply(response: &mut Response) {
    for (name, value) in [ALLOW_ORIGIN, ALLOW_METHODS, ALLOW_HEADERS] {
        response.set_header(name, value);
    }
}

/// Answer to an `OPTIONS` preflight: 200 with an empty body.
pub fn preflight() -> Response {
    let mut response = ResponseBuilder::new(StatusCode::Ok).build();
    apply(&mut response);
    response
}
