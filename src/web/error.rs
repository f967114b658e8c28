//! HTML error pages for the Yatube site.
//!
//! Handlers return [`PageError`]. The response it produces carries an
//! [`ErrorPage`] marker, and the [`render_error_pages`] middleware replaces
//! the plain body with the `error` template inside the site layout.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};

use crate::template::{escape_html, TemplateError};
use crate::YatubeError;

use super::handlers::AppState;
use super::middleware::Session;

/// Message shown on 404 pages.
pub const NOT_FOUND_MESSAGE: &str = "Page not found";

/// Message shown on 500 pages.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error returned by page handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageError {
    /// HTTP status code.
    pub status: StatusCode,
    /// Message shown to the visitor.
    pub message: String,
}

/// Marker left in response extensions for [`render_error_pages`].
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub message: String,
}

impl PageError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 404 Not Found.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    /// 500 Internal Server Error.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    /// Standalone document used when the layout cannot be rendered.
    fn fallback_body(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{status}</title></head>\n<body><h1>{status}</h1><p>{message}</p></body>\n</html>\n",
            status = self.status.as_u16(),
            message = escape_html(&self.message),
        )
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for PageError {}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Html(self.fallback_body())).into_response();
        response.extensions_mut().insert(ErrorPage {
            status: self.status,
            message: self.message,
        });
        response
    }
}

impl From<YatubeError> for PageError {
    fn from(err: YatubeError) -> Self {
        match &err {
            YatubeError::NotFound(what) => {
                tracing::debug!("Not found: {}", what);
                PageError::not_found()
            }
            _ => {
                tracing::error!("Internal error: {}", err);
                PageError::internal()
            }
        }
    }
}

impl From<TemplateError> for PageError {
    fn from(err: TemplateError) -> Self {
        YatubeError::from(err).into()
    }
}

/// Middleware rendering [`ErrorPage`] responses with the site templates.
pub async fn render_error_pages(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let user = req
        .extensions()
        .get::<Session>()
        .and_then(|session| session.0.clone());
    let mut response = next.run(req).await;

    let Some(page) = response.extensions_mut().remove::<ErrorPage>() else {
        return response;
    };

    match state.render_error(&page, user.as_ref()) {
        Ok(html) => (page.status, html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            response
        }
    }
}

/// Fallback handler for unknown paths.
pub async fn not_found() -> PageError {
    PageError::not_found()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_error_constructors() {
        assert_eq!(PageError::not_found().status, StatusCode::NOT_FOUND);
        assert_eq!(PageError::not_found().message, NOT_FOUND_MESSAGE);
        assert_eq!(
            PageError::internal().status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_yatube_error() {
        let err: PageError = YatubeError::NotFound("group cats".to_string()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: PageError = YatubeError::Database("disk I/O error".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_into_response_keeps_marker() {
        let response = PageError::not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let marker = response.extensions().get::<ErrorPage>().unwrap();
        assert_eq!(marker.status, StatusCode::NOT_FOUND);
        assert_eq!(marker.message, NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_fallback_body_is_escaped() {
        let err = PageError::new(StatusCode::BAD_REQUEST, "<script>");
        let body = err.fallback_body();
        assert!(body.contains("<h1>400</h1>"));
        assert!(body.contains("&lt;script&gt;"));
    }
}
