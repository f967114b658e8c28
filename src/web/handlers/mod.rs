//! Page handlers for the Yatube site.

pub mod auth;
pub mod posts;

use std::sync::Arc;

use axum::{
    http::{header::LOCATION, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::auth::{Identity, SessionTokens};
use crate::blog::PostView;
use crate::config::{Config, SiteConfig};
use crate::datetime::format_pub_date;
use crate::db::Database;
use crate::template::{TemplateContext, TemplateEngine, Value};

use super::error::{ErrorPage, PageError};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Session token issuer and verifier.
    pub tokens: Arc<SessionTokens>,
    /// Parsed page templates.
    pub templates: Arc<TemplateEngine>,
    /// Site name and home heading.
    pub site: SiteConfig,
    /// Timezone used to display publication dates.
    pub timezone: String,
    /// Whether the session cookie is marked `Secure`.
    pub secure_cookie: bool,
}

impl AppState {
    /// Create application state with default settings.
    pub fn new(db: Database, templates: TemplateEngine, jwt_secret: &str) -> Self {
        Self {
            db,
            tokens: Arc::new(SessionTokens::new(jwt_secret, 86_400)),
            templates: Arc::new(templates),
            site: SiteConfig::default(),
            timezone: "UTC".to_string(),
            secure_cookie: false,
        }
    }

    /// Create application state from the configuration file.
    pub fn from_config(db: Database, templates: TemplateEngine, config: &Config) -> Self {
        Self {
            db,
            tokens: Arc::new(SessionTokens::new(
                &config.auth.jwt_secret,
                config.auth.token_expiry_secs,
            )),
            templates: Arc::new(templates),
            site: config.site.clone(),
            timezone: config.server.timezone.clone(),
            secure_cookie: config.auth.secure_cookie,
        }
    }

    /// Set the site information.
    pub fn with_site(mut self, site: SiteConfig) -> Self {
        self.site = site;
        self
    }

    /// Set the display timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Replace the publication date of a post with its display form.
    pub fn localize(&self, mut post: PostView) -> PostView {
        post.pub_date = format_pub_date(&post.pub_date, &self.timezone);
        post
    }

    /// Render a page template inside the site layout.
    pub fn render_page(
        &self,
        template: &str,
        title: &str,
        user: Option<&Identity>,
        context: &TemplateContext,
    ) -> Result<Html<String>, PageError> {
        let content = self.templates.render(template, context)?;
        let mut layout = TemplateContext::new();
        layout.set("site_name", self.site.name.as_str());
        layout.set("title", title);
        layout.set("user", Value::from_serialize(&user)?);
        layout.set("content", content);
        Ok(Html(self.templates.render("base", &layout)?))
    }

    /// Render an error page inside the site layout.
    pub fn render_error(
        &self,
        page: &ErrorPage,
        user: Option<&Identity>,
    ) -> Result<Html<String>, PageError> {
        let mut context = TemplateContext::new();
        context.set("status", i64::from(page.status.as_u16()));
        context.set("message", page.message.as_str());
        self.render_page("error", &page.message, user, &context)
    }
}

/// `302 Found` redirect to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
