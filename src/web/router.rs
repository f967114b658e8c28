//! Router configuration for the Yatube site.

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::error::{not_found, render_error_pages};
use super::handlers::{auth, posts, AppState};
use super::middleware::{security_headers, session_auth};

/// Create the site router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let page_routes = Router::new()
        .route("/", get(posts::index))
        .route("/group/:slug/", get(posts::group_posts))
        .route("/profile/:username/", get(posts::profile))
        .route("/posts/:post_id/", get(posts::post_detail))
        .route(
            "/posts/:post_id/edit/",
            get(posts::post_edit_form).post(posts::post_edit),
        )
        .route(
            "/create/",
            get(posts::post_create_form).post(posts::post_create),
        );

    let auth_routes = Router::new()
        .route("/auth/login/", get(auth::login_form).post(auth::login))
        .route("/auth/logout/", get(auth::logout).post(auth::logout));

    Router::new()
        .merge(page_routes)
        .merge(auth_routes)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn_with_state(
                    app_state.clone(),
                    session_auth,
                ))
                .layer(middleware::from_fn_with_state(
                    app_state.clone(),
                    render_error_pages,
                )),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateLoader;
    use crate::Database;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn site_router() -> Router {
        let db = Database::open_in_memory().await.unwrap();
        let templates = TemplateLoader::builtin().load().unwrap();
        create_router(Arc::new(AppState::new(db, templates, "test-secret")))
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = create_health_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn test_fallback_renders_error_page() {
        let response = site_router()
            .await
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers().get("X-Frame-Options").unwrap(), "DENY");

        let html = body_text(response).await;
        assert!(html.contains("<h1>404</h1>"));
        assert!(html.contains("<title>Page not found | Yatube</title>"));
    }

    #[tokio::test]
    async fn test_anonymous_create_redirects_to_login() {
        let response = site_router()
            .await
            .oneshot(Request::builder().uri("/create/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/auth/login/?next=/create/"
        );
    }
}
