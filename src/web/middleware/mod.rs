//! Middleware for the web site.

pub mod auth;
pub mod security;

pub use auth::{
    identity_from_headers, login_url, resolve_identity, session_auth, token_from_headers,
    CurrentUser, LoginRedirect, MaybeUser, Session, LOGIN_PATH, SESSION_COOKIE,
};
pub use security::security_headers;
