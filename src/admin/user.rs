//! User management for administrators.

use tracing::info;

use crate::auth::{hash_password, validate_username};
use crate::db::{NewUser, User, UserRepository};

use super::{AdminError, AdminService};

impl AdminService<'_> {
    /// Create a user with the given password.
    ///
    /// Usernames are unique case-insensitively.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User, AdminError> {
        validate_username(username)?;
        let password_hash = hash_password(password)?;

        let repo = UserRepository::new(self.db.pool());
        if repo.username_exists(username).await? {
            return Err(AdminError::AlreadyExists(format!("user '{username}'")));
        }

        let user = repo.create(&NewUser::new(username, password_hash)).await?;
        info!(user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Delete a user and all of their posts.
    pub async fn delete_user(&self, username: &str) -> Result<(), AdminError> {
        let repo = UserRepository::new(self.db.pool());
        let user = repo
            .get_by_username(username)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("user '{username}'")))?;

        repo.delete(user.id).await?;
        info!(user_id = user.id, username = %user.username, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::{NewPost, PostRepository};
    use crate::auth::verify_password;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let db = setup_db().await;
        let admin = AdminService::new(&db);

        let user = admin.create_user("leo", "war-and-peace").await.unwrap();
        assert_eq!(user.username, "leo");
        assert_ne!(user.password, "war-and-peace");
        assert!(verify_password("war-and-peace", &user.password).is_ok());
    }

    #[tokio::test]
    async fn test_create_user_rejects_bad_input() {
        let db = setup_db().await;
        let admin = AdminService::new(&db);

        assert!(matches!(
            admin.create_user("bad name", "war-and-peace").await,
            Err(AdminError::Username(_))
        ));
        assert!(matches!(
            admin.create_user("leo", "short").await,
            Err(AdminError::Password(_))
        ));
    }

    #[tokio::test]
    async fn test_create_user_duplicate() {
        let db = setup_db().await;
        let admin = AdminService::new(&db);

        admin.create_user("leo", "war-and-peace").await.unwrap();
        assert!(matches!(
            admin.create_user("Leo", "anna-karenina").await,
            Err(AdminError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_user_removes_posts() {
        let db = setup_db().await;
        let admin = AdminService::new(&db);
        let user = admin.create_user("leo", "war-and-peace").await.unwrap();

        let posts = PostRepository::new(db.pool());
        posts
            .create(&NewPost::new(user.id, "A post that will vanish"))
            .await
            .unwrap();

        admin.delete_user("leo").await.unwrap();
        assert_eq!(posts.count().await.unwrap(), 0);

        assert!(matches!(
            admin.delete_user("leo").await,
            Err(AdminError::NotFound(_))
        ));
    }
}
