//! Group management for administrators.

use tracing::info;

use crate::blog::{is_valid_slug, Group, GroupRepository, NewGroup, MAX_TITLE_LENGTH};

use super::{AdminError, AdminService};

impl AdminService<'_> {
    /// Create a group.
    pub async fn create_group(
        &self,
        slug: &str,
        title: &str,
        description: &str,
    ) -> Result<Group, AdminError> {
        if !is_valid_slug(slug) {
            return Err(AdminError::InvalidInput(format!(
                "slug '{slug}' must be 1-50 letters, digits, '-' or '_'"
            )));
        }
        let title = title.trim();
        if title.is_empty() || title.chars().count() > MAX_TITLE_LENGTH {
            return Err(AdminError::InvalidInput(format!(
                "title must be 1-{MAX_TITLE_LENGTH} characters"
            )));
        }

        let repo = GroupRepository::new(self.db.pool());
        if repo.slug_exists(slug).await? {
            return Err(AdminError::AlreadyExists(format!("group '{slug}'")));
        }

        let group = repo
            .create(&NewGroup::new(slug, title).with_description(description))
            .await?;
        info!(group_id = group.id, slug = %group.slug, "Group created");
        Ok(group)
    }

    /// Delete a group. Its posts are kept without a group.
    pub async fn delete_group(&self, slug: &str) -> Result<(), AdminError> {
        let repo = GroupRepository::new(self.db.pool());
        let group = repo
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("group '{slug}'")))?;

        repo.delete(group.id).await?;
        info!(group_id = group.id, slug = %group.slug, "Group deleted");
        Ok(())
    }
}
