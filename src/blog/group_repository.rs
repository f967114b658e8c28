//! Group repository for Yatube.

use super::group::{Group, NewGroup};
use crate::db::DbPool;
use crate::{Result, YatubeError};

/// Repository for group CRUD operations.
pub struct GroupRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> GroupRepository<'a> {
    /// Create a new GroupRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new group.
    ///
    /// Fails if the slug is already used by another group.
    pub async fn create(&self, new_group: &NewGroup) -> Result<Group> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO groups (title, slug, description) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_group.title)
        .bind(&new_group.slug)
        .bind(&new_group.description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| YatubeError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| YatubeError::NotFound("group".to_string()))
    }

    /// Get a group by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| YatubeError::Database(e.to_string()))?;

        Ok(group)
    }

    /// Get a group by slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| YatubeError::Database(e.to_string()))?;

        Ok(group)
    }

    /// List all groups ordered by title.
    pub async fn list_all(&self) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups ORDER BY title ASC, id ASC",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| YatubeError::Database(e.to_string()))?;

        Ok(groups)
    }

    /// Delete a group by ID. Its posts stay, detached from any group.
    ///
    /// Returns true if a group was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| YatubeError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Check if a slug is already taken.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM groups WHERE slug = ?)")
            .bind(slug)
            .fetch_one(self.pool)
            .await
            .map_err(|e| YatubeError::Database(e.to_string()))?;
        Ok(exists)
    }
}
