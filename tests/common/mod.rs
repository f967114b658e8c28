//! Test helpers for the web integration tests.
//!
//! Builds the site router on an in-memory database and seeds users, groups
//! and posts directly through the repositories.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;

use yatube::auth::Identity;
use yatube::blog::{Group, GroupRepository, NewGroup, NewPost, Post, PostRepository};
use yatube::db::{NewUser, User, UserRepository};
use yatube::template::TemplateLoader;
use yatube::web::handlers::AppState;
use yatube::web::middleware::SESSION_COOKIE;
use yatube::web::router::create_router;
use yatube::Database;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// A running test site.
pub struct TestSite {
    pub server: TestServer,
    pub state: Arc<AppState>,
}

impl TestSite {
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// `Cookie` header value that logs `user` in.
    pub fn session_for(&self, user: &User) -> String {
        let token = self
            .state
            .tokens
            .issue(&Identity::new(user.id, user.username.clone()))
            .expect("Failed to issue session token");
        format!("{SESSION_COOKIE}={token}")
    }

    /// Number of posts in the database.
    pub async fn post_count(&self) -> i64 {
        PostRepository::new(self.db().pool())
            .count()
            .await
            .expect("Failed to count posts")
    }

    pub async fn get_post(&self, id: i64) -> Post {
        PostRepository::new(self.db().pool())
            .get_by_id(id)
            .await
            .expect("Failed to load post")
            .expect("Post not found")
    }
}

/// Create a test site with an in-memory database.
pub async fn create_test_site() -> TestSite {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let templates = TemplateLoader::builtin()
        .load()
        .expect("Failed to load templates");

    let state = Arc::new(AppState::new(db, templates, TEST_SECRET));
    let router = create_router(state.clone());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestSite { server, state }
}

/// Insert a user that cannot log in with a password.
pub async fn create_user(db: &Database, username: &str) -> User {
    UserRepository::new(db.pool())
        .create(&NewUser::new(username, "not-a-password-hash"))
        .await
        .expect("Failed to create user")
}

pub async fn create_group(db: &Database, slug: &str, title: &str) -> Group {
    GroupRepository::new(db.pool())
        .create(&NewGroup::new(slug, title).with_description(format!("About {title}")))
        .await
        .expect("Failed to create group")
}

pub async fn create_post(db: &Database, author: &User, text: &str, group: Option<&Group>) -> Post {
    let new_post = NewPost::new(author.id, text).with_group(group.map(|g| g.id));
    PostRepository::new(db.pool())
        .create(&new_post)
        .await
        .expect("Failed to create post")
}

/// Number of post cards on a listing page.
pub fn count_cards(html: &str) -> usize {
    html.matches("<article class=\"post\">").count()
}
