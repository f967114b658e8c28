//! Response headers that keep pages out of frames and shared caches.

use axum::{
    body::Body,
    http::{
        header::{
            HeaderName, HeaderValue, CACHE_CONTROL, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
        Request,
    },
    middleware::Next,
    response::Response,
};

/// Headers set on every response, replacing any handler value.
const FIXED_HEADERS: [(HeaderName, &str); 3] = [
    (X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (X_FRAME_OPTIONS, "DENY"),
    (REFERRER_POLICY, "strict-origin-when-cross-origin"),
];

/// Cache policy for responses that do not set their own.
///
/// Pages depend on the session cookie, so they are marked `private`.
const DEFAULT_CACHE_CONTROL: &str = "private, no-cache";

/// Add the security headers to every response, error pages included.
pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in FIXED_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    headers
        .entry(CACHE_CONTROL)
        .or_insert(HeaderValue::from_static(DEFAULT_CACHE_CONTROL));

    response
}
