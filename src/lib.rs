//! Yatube - a small blogging site.
//!
//! Authors write short posts, optionally filed under a group. Visitors browse
//! the newest posts, a group's posts or an author's profile, ten per page.

pub mod admin;
pub mod auth;
pub mod blog;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod template;
pub mod web;

pub use auth::{hash_password, verify_password, Identity, PasswordError, SessionTokens};
pub use blog::{BlogService, Group, Page, Post, PostForm, PostView};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{Result, YatubeError};
pub use web::WebServer;
