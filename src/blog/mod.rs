//! Blog module for Yatube.
//!
//! This module provides groups and posts:
//! - Models and repositories backed by SQLite
//! - Post form validation
//! - Listing pagination
//! - [`BlogService`], which assembles page data and saves submissions

mod form;
mod group;
mod group_repository;
mod paginator;
mod post;
mod post_repository;
mod service;

pub use form::{
    validate_text, CleanedPost, FormErrors, PostForm, INVALID_GROUP_MESSAGE, MIN_TEXT_LENGTH,
    TEXT_REQUIRED_MESSAGE, TEXT_TOO_SHORT_MESSAGE,
};
pub use group::{is_valid_slug, Group, NewGroup, MAX_SLUG_LENGTH, MAX_TITLE_LENGTH};
pub use group_repository::GroupRepository;
pub use paginator::{Page, Paginator, POSTS_PER_PAGE};
pub use post::{NewPost, Post, PostUpdate, PostView, SHORT_TEXT_LENGTH};
pub use post_repository::PostRepository;
pub use service::{
    BlogService, GroupContext, GroupOption, PostDetailContext, PostFlow, PostFormContext,
    ProfileContext,
};
