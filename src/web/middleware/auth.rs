//! Session cookie authentication.
//!
//! The signed session token lives in the `yatube_session` cookie; an
//! `Authorization: Bearer` header is accepted as well. [`session_auth`]
//! resolves the visitor once per request and stores it as a [`Session`]
//! for the extractors below.

use std::sync::Arc;

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, OriginalUri, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{Identity, SessionTokens};
use crate::db::{Database, UserRepository};
use crate::web::handlers::{found, AppState};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "yatube_session";

/// Path of the login page.
pub const LOGIN_PATH: &str = "/auth/login/";

/// Read the raw session token from the request headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })
}

/// Resolve the visitor from the request headers.
///
/// Missing, expired or tampered tokens give an anonymous visitor.
pub fn identity_from_headers(headers: &HeaderMap, tokens: &SessionTokens) -> Option<Identity> {
    let token = token_from_headers(headers)?;
    match tokens.verify(&token) {
        Ok(identity) => Some(identity),
        Err(e) => {
            tracing::debug!("Ignoring session token: {}", e);
            None
        }
    }
}

/// Login page URL that returns to `next` afterwards.
pub fn login_url(next: &str) -> String {
    format!(
        "{}?next={}",
        LOGIN_PATH,
        urlencoding::encode(next).replace("%2F", "/")
    )
}

/// Visitor resolved by [`session_auth`], stored in request extensions.
#[derive(Debug, Clone, Default)]
pub struct Session(pub Option<Identity>);

/// Resolve the visitor and confirm the account still exists.
///
/// A valid token for a deleted user gives an anonymous visitor.
pub async fn resolve_identity(
    headers: &HeaderMap,
    tokens: &SessionTokens,
    db: &Database,
) -> Option<Identity> {
    let identity = identity_from_headers(headers, tokens)?;
    match UserRepository::new(db.pool()).get_by_id(identity.user_id).await {
        Ok(Some(user)) => Some(Identity::new(user.id, user.username)),
        Ok(None) => {
            tracing::debug!("Session for missing user {} ignored", identity.user_id);
            None
        }
        Err(e) => {
            tracing::error!("Failed to load session user {}: {}", identity.user_id, e);
            None
        }
    }
}

fn identity_from_parts(parts: &Parts) -> Option<Identity> {
    parts
        .extensions
        .get::<Session>()
        .and_then(|session| session.0.clone())
}

/// Extractor for pages that require a logged-in user.
///
/// Anonymous visitors are redirected to the login page with the requested
/// path in `next`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

/// Rejection of [`CurrentUser`]: a redirect to the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    /// Path the visitor asked for.
    pub next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        found(&login_url(&self.next))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = identity_from_parts(parts) {
            return Ok(CurrentUser(identity));
        }

        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let next = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        tracing::debug!("Anonymous request for {}, redirecting to login", next);
        Err(LoginRedirect { next })
    }
}

/// Extractor for pages open to everyone.
#[derive(Debug, Clone, Default)]
pub struct MaybeUser(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(identity_from_parts(parts)))
    }
}

/// Middleware function to resolve the visitor into request extensions.
pub async fn session_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let identity = resolve_identity(request.headers(), &state.tokens, &state.db).await;
    request.extensions_mut().insert(Session(identity));
    next.run(request).await
}
