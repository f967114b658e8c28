//! Post pages: listings, detail, create and edit.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::request::Parts,
    response::{Html, IntoResponse, Response},
    Form,
};

use crate::blog::{BlogService, Post, PostFlow, PostForm, PostFormContext};
use crate::template::{TemplateContext, Value};
use crate::web::error::PageError;
use crate::web::middleware::{CurrentUser, MaybeUser};

use super::{found, AppState};

/// Characters of the post text used in the detail page title.
const TITLE_TEXT_LENGTH: usize = 30;

/// `?page=` query of the listing pages.
///
/// Never rejects: an unparsable query string has no page, and a repeated
/// `page` parameter uses its last value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Raw page number; resolved by the paginator.
    pub page: Option<String>,
}

impl PageQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let page = pairs
            .into_iter()
            .filter(|(key, _)| key == "page")
            .map(|(_, value)| value)
            .last();
        Self { page }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        Ok(Self::from_pairs(pairs))
    }
}

/// Parse the `post_id` path segment. Non-numeric ids do not exist.
fn parse_post_id(raw: &str) -> Result<i64, PageError> {
    raw.parse::<i64>().map_err(|_| PageError::not_found())
}

/// URL of an author's profile page.
pub fn profile_url(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

/// URL of a post's detail page.
pub fn post_url(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

/// GET / - newest posts first.
pub async fn index(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    query: PageQuery,
) -> Result<Html<String>, PageError> {
    let page = BlogService::new(&state.db)
        .home(query.page.as_deref())
        .await?
        .map(|post| state.localize(post));

    let mut context = TemplateContext::new();
    context.set("heading", state.site.home_heading.as_str());
    context.set("page", Value::from_serialize(&page)?);

    state.render_page("index", &state.site.home_heading, user.as_ref(), &context)
}

/// GET /group/{slug}/ - posts of one group.
pub async fn group_posts(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(slug): Path<String>,
    query: PageQuery,
) -> Result<Html<String>, PageError> {
    let mut data = BlogService::new(&state.db)
        .group_posts(&slug, query.page.as_deref())
        .await?;
    data.page = data.page.map(|post| state.localize(post));

    let mut context = TemplateContext::new();
    context.extend_from(&data)?;

    let title = format!("Posts of the group {}", data.group.title);
    state.render_page("group_list", &title, user.as_ref(), &context)
}

/// GET /profile/{username}/ - posts of one author.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(username): Path<String>,
    query: PageQuery,
) -> Result<Html<String>, PageError> {
    let mut data = BlogService::new(&state.db)
        .profile(&username, query.page.as_deref())
        .await?;
    data.page = data.page.map(|post| state.localize(post));

    let mut context = TemplateContext::new();
    context.extend_from(&data)?;

    let title = format!("Profile of {}", data.author.username);
    state.render_page("profile", &title, user.as_ref(), &context)
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(post_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let post_id = parse_post_id(&post_id)?;
    let mut data = BlogService::new(&state.db)
        .post_detail(post_id, user.as_ref())
        .await?;
    data.post = state.localize(data.post);

    let mut context = TemplateContext::new();
    context.extend_from(&data)?;

    let excerpt: String = data.post.text.chars().take(TITLE_TEXT_LENGTH).collect();
    let title = format!("Post {excerpt}");
    state.render_page("post_detail", &title, user.as_ref(), &context)
}

/// Render the create/edit form.
fn render_form(
    state: &AppState,
    user: &CurrentUser,
    form: &PostFormContext,
) -> Result<Response, PageError> {
    let mut context = TemplateContext::new();
    context.extend_from(form)?;

    let title = if form.is_edit { "Edit post" } else { "New post" };
    Ok(state
        .render_page("create_post", title, Some(&user.0), &context)?
        .into_response())
}

/// Map the outcome of a submission to a response.
///
/// A saved post redirects to `saved_to(post)`.
fn respond(
    state: &AppState,
    user: &CurrentUser,
    flow: PostFlow,
    saved_to: impl FnOnce(&Post) -> String,
) -> Result<Response, PageError> {
    match flow {
        PostFlow::FormShown(form) => render_form(state, user, &form),
        PostFlow::Persisted(post) => Ok(found(&saved_to(&post))),
        PostFlow::NotAuthor { post_id } => Ok(found(&post_url(post_id))),
    }
}

/// GET /create/
pub async fn post_create_form(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Response, PageError> {
    let form = BlogService::new(&state.db).new_post_form().await?;
    render_form(&state, &user, &form)
}

/// POST /create/ - on success the author lands on their profile.
pub async fn post_create(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Form(form): Form<PostForm>,
) -> Result<Response, PageError> {
    let flow = BlogService::new(&state.db)
        .create_post(&user.0, &form)
        .await?;
    let profile = profile_url(&user.0.username);
    respond(&state, &user, flow, |_| profile)
}

/// GET /posts/{post_id}/edit/
pub async fn post_edit_form(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Response, PageError> {
    let post_id = parse_post_id(&post_id)?;
    let flow = BlogService::new(&state.db)
        .edit_post_form(&user.0, post_id)
        .await?;
    respond(&state, &user, flow, |post| post_url(post.id))
}

/// POST /posts/{post_id}/edit/ - on success the author lands on the post.
pub async fn post_edit(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(post_id): Path<String>,
    Form(form): Form<PostForm>,
) -> Result<Response, PageError> {
    let post_id = parse_post_id(&post_id)?;
    let flow = BlogService::new(&state.db)
        .edit_post(&user.0, post_id, &form)
        .await?;
    respond(&state, &user, flow, |post| post_url(post.id))
}
