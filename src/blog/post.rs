//! Post model for Yatube.

use std::fmt;

use serde::Serialize;

/// Number of characters of the text used as the short display form.
pub const SHORT_TEXT_LENGTH: usize = 15;

/// Post entity as stored.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Post body.
    pub text: String,
    /// Publication timestamp (UTC), assigned on insert and never changed.
    pub pub_date: String,
    /// ID of the author.
    pub author_id: i64,
    /// ID of the group, if the post belongs to one.
    pub group_id: Option<i64>,
}

impl Post {
    /// Check whether the given user wrote this post.
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short: String = self.text.chars().take(SHORT_TEXT_LENGTH).collect();
        write!(f, "{short}")
    }
}

/// A post joined with its author name and group, as listed on pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PostView {
    /// Post ID.
    pub id: i64,
    /// Post body.
    pub text: String,
    /// Publication timestamp (UTC).
    pub pub_date: String,
    /// Author ID.
    pub author_id: i64,
    /// Author username.
    pub author_username: String,
    /// Group ID.
    pub group_id: Option<i64>,
    /// Group slug.
    pub group_slug: Option<String>,
    /// Group title.
    pub group_title: Option<String>,
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Post body.
    pub text: String,
    /// ID of the author.
    pub author_id: i64,
    /// Optional group.
    pub group_id: Option<i64>,
}

impl NewPost {
    /// Create a new post without a group.
    pub fn new(author_id: i64, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author_id,
            group_id: None,
        }
    }

    /// Put the post into a group.
    pub fn with_group(mut self, group_id: Option<i64>) -> Self {
        self.group_id = group_id;
        self
    }
}

/// Data for updating an existing post. Author and publication date are immutable.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    /// New text.
    pub text: Option<String>,
    /// New group (`Some(None)` detaches the post from its group).
    pub group_id: Option<Option<i64>>,
}

impl PostUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set new group.
    pub fn group(mut self, group_id: Option<i64>) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.group_id.is_none()
    }
}
