//! Testing utilities for turbo-response views
//!
//! - [`body_string`] / [`content_type`] - read an axum response back
//! - [`form_request`] - build a urlencoded request for `oneshot`
//! - [`assert_fragment`], [`assert_full`], [`assert_redirect`] - check a
//!   [`ViewResponse`] without going through HTTP
//! - [`fixtures`] - a `Todo` model, its form and matching templates
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{http::Method, Router};
//! use tower::ServiceExt;
//! use turbo_response::testing::{body_string, form_request};
//!
//! # async fn example(app: Router) {
//! let response = app
//!     .oneshot(form_request(Method::POST, "/todos/new", ""))
//!     .await
//!     .unwrap();
//! assert!(body_string(response).await.starts_with("<fragment-stream"));
//! # }
//! ```

pub mod fixtures;

use axum::{
    body::{self, Body},
    http::{header, Method, Request},
    response::Response,
};

use crate::fragment::Action;
use crate::response::{ViewResponse, FRAGMENT_STREAM_CONTENT_TYPE, HTML_CONTENT_TYPE};

/// Collect a response body into a string
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
pub async fn body_string(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body is not UTF-8")
}

/// The `content-type` header, if present and valid
#[must_use]
pub fn content_type(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

/// Request carrying a urlencoded form body
///
/// # Panics
///
/// Panics if `uri` is not a valid URI.
#[must_use]
pub fn form_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .expect("Failed to build request")
}

/// Assert `response` is a single fragment-stream with `action` and `target`
///
/// # Panics
///
/// Panics if the response is not such a fragment.
pub fn assert_fragment(response: &ViewResponse, action: Action, target: &str) {
    assert_eq!(
        response.content_type(),
        Some(FRAGMENT_STREAM_CONTENT_TYPE),
        "expected a fragment-stream response, got {response:?}"
    );
    let fragment = response
        .rendered()
        .and_then(|rendered| rendered.body.fragment())
        .expect("Response carries no fragment");
    assert_eq!(fragment.action(), action, "fragment action");
    assert_eq!(fragment.target(), target, "fragment target");
}

/// Assert `response` is full HTML rendered from `template_name` without fragment keys
///
/// # Panics
///
/// Panics if the response is not such a page.
pub fn assert_full(response: &ViewResponse, template_name: &str) {
    assert_eq!(
        response.content_type(),
        Some(HTML_CONTENT_TYPE),
        "expected a full HTML response, got {response:?}"
    );
    assert_eq!(response.template_name(), Some(template_name), "template name");
    assert!(
        !response.context().is_some_and(|c| c.is_fragment_response()),
        "full response must not carry fragment keys"
    );
}

/// Assert `response` redirects to `url`
///
/// # Panics
///
/// Panics if the response is not a redirect to `url`.
pub fn assert_redirect(response: &ViewResponse, url: &str) {
    assert_eq!(response.redirect_url(), Some(url), "expected redirect, got {response:?}");
}
