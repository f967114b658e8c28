//! Login and logout.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use validator::Validate;

use crate::auth::{verify_password, Identity};
use crate::db::UserRepository;
use crate::template::TemplateContext;
use crate::web::error::PageError;
use crate::web::middleware::{MaybeUser, SESSION_COOKIE};

use super::{found, AppState};

/// Shown for any failed login attempt.
pub const LOGIN_FAILED_MESSAGE: &str = "Please enter a correct username and password.";

/// `?next=` query of the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Submitted login form.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
    /// Where to go after logging in.
    #[serde(default)]
    pub next: String,
}

/// Local path to redirect to after login; anything else goes home.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

fn render_login(
    state: &AppState,
    user: Option<&Identity>,
    next: &str,
    username: &str,
    error: Option<&str>,
) -> Result<Response, PageError> {
    let mut context = TemplateContext::new();
    context.set("next", next);
    context.set("username", username);
    context.set("error", error);
    Ok(state
        .render_page("login", "Log in", user, &context)?
        .into_response())
}

/// GET /auth/login/
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<LoginQuery>,
) -> Result<Response, PageError> {
    let next = query.next.as_deref().unwrap_or_default();
    render_login(&state, user.as_ref(), next, "", None)
}

/// Check the submitted credentials.
async fn authenticate(state: &AppState, form: &LoginForm) -> Result<Option<Identity>, PageError> {
    if form.validate().is_err() {
        return Ok(None);
    }

    let user = UserRepository::new(state.db.pool())
        .get_by_username(&form.username)
        .await?;

    let Some(user) = user else {
        tracing::debug!(username = %form.username, "Login for unknown user");
        return Ok(None);
    };

    if let Err(e) = verify_password(&form.password, &user.password) {
        tracing::debug!(username = %user.username, "Login rejected: {}", e);
        return Ok(None);
    }

    Ok(Some(Identity::new(user.id, user.username)))
}

/// POST /auth/login/ - sets the session cookie on success.
pub async fn login(
    State(state): State<Arc<AppState>>,
    MaybeUser(current): MaybeUser,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let Some(identity) = authenticate(&state, &form).await? else {
        return render_login(
            &state,
            current.as_ref(),
            &form.next,
            &form.username,
            Some(LOGIN_FAILED_MESSAGE),
        );
    };

    let token = state.tokens.issue(&identity)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.secure_cookie);

    tracing::info!(user_id = identity.user_id, username = %identity.username, "User logged in");

    let target = safe_next(Some(form.next.as_str()).filter(|next| !next.is_empty()));
    Ok((jar.add(cookie), found(target)).into_response())
}

/// GET or POST /auth/logout/ - clears the session cookie.
pub async fn logout(MaybeUser(user): MaybeUser, jar: CookieJar) -> Response {
    if let Some(identity) = user {
        tracing::info!(user_id = identity.user_id, username = %identity.username, "User logged out");
    }
    let removal = Cookie::build(SESSION_COOKIE).path("/");
    (jar.remove(removal), found("/")).into_response()
}
