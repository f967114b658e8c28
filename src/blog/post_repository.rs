//! Post repository for Yatube.
//!
//! Every listing is ordered newest first; `id` breaks ties between posts
//! published within the same millisecond.

use sqlx::QueryBuilder;

use super::post::{NewPost, Post, PostUpdate, PostView};
use crate::db::DbPool;
use crate::{Result, YatubeError};

/// Columns and joins producing a [`PostView`].
const VIEW_SELECT: &str = "SELECT p.id, p.text, p.pub_date, p.author_id,
        u.username AS author_username,
        p.group_id, g.slug AS group_slug, g.title AS group_title
     FROM posts p
     JOIN users u ON u.id = p.author_id
     LEFT JOIN groups g ON g.id = p.group_id";

const NEWEST_FIRST: &str = "ORDER BY p.pub_date DESC, p.id DESC";

/// Repository for post CRUD operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post. The publication date is assigned by the database.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (text, author_id, group_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_post.text)
        .bind(new_post.author_id)
        .bind(new_post.group_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| YatubeError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| YatubeError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, text, pub_date, author_id, group_id FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| YatubeError::Database(e.to_string()))?;

        Ok(post)
    }

    /// Get a post with its author and group by ID.
    pub async fn get_view_by_id(&self, id: i64) -> Result<Option<PostView>> {
        let query = format!("{VIEW_SELECT} WHERE p.id = ?");
        let post = sqlx::query_as::<_, PostView>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| YatubeError::Database(e.to_string()))?;

        Ok(post)
    }

    /// Update a post by ID.
    ///
    /// Only fields that are set in the update are modified.
    /// Returns the updated post, or None if not found.
    pub async fn update(&self, id: i64, update: &PostUpdate) -> Result<Option<Post>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE posts SET ");
        let mut separated = query.separated(", ");

        if let Some(ref text) = update.text {
            separated.push("text = ");
            separated.push_bind_unseparated(text);
        }
        if let Some(group_id) = update.group_id {
            separated.push("group_id = ");
            separated.push_bind_unseparated(group_id);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| YatubeError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// List a page of all posts.
    pub async fn list_recent(&self, offset: i64, limit: i64) -> Result<Vec<PostView>> {
        let query = format!("{VIEW_SELECT} {NEWEST_FIRST} LIMIT ? OFFSET ?");
        let posts = sqlx::query_as::<_, PostView>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await
            .map_err(|e| YatubeError::Database(e.to_string()))?;

        Ok(posts)
    }

    /// List a page of the posts in a group.
    pub async fn list_by_group(
        &self,
        group_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PostView>> {
        let query = format!("{VIEW_SELECT} WHERE p.group_id = ? {NEWEST_FIRST} LIMIT ? OFFSET ?");
        let posts = sqlx::query_as::<_, PostView>(&query)
            .bind(group_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await
            .map_err(|e| YatubeError::Database(e.to_string()))?;

        Ok(posts)
    }

    /// List a page of the posts written by a user.
    pub async fn list_by_author(
        &self,
        author_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PostView>> {
        let query = format!("{VIEW_SELECT} WHERE p.author_id = ? {NEWEST_FIRST} LIMIT ? OFFSET ?");
        let posts = sqlx::query_as::<_, PostView>(&query)
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await
            .map_err(|e| YatubeError::Database(e.to_string()))?;

        Ok(posts)
    }

    /// Count all posts.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool)
            .await
            .map_err(|e| YatubeError::Database(e.to_string()))?;
        Ok(count)
    }

    /// Count posts in a group.
    pub async fn count_by_group(&self, group_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id = ?")
            .bind(group_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| YatubeError::Database(e.to_string()))?;
        Ok(count)
    }

    /// Count posts written by a user.
    pub async fn count_by_author(&self, author_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| YatubeError::Database(e.to_string()))?;
        Ok(count)
    }
}
