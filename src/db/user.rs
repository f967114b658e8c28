//! User model for Yatube.

use serde::Serialize;

/// A registered user. Authors of posts are users.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login name, unique case-insensitively.
    pub username: String,
    /// Password hash (Argon2 PHC string).
    pub password: String,
    /// Account creation timestamp.
    pub created_at: String,
}

impl User {
    /// Public part of the user, safe to hand to templates.
    pub fn author(&self) -> Author {
        Author {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Public view of a user as shown on profile and post pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login name.
    pub username: String,
    /// Already hashed password.
    pub password: String,
}

impl NewUser {
    /// Create a new user from a username and a password hash.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password_hash.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_hides_password() {
        let user = User {
            id: 7,
            username: "leo".to_string(),
            password: "$argon2id$...".to_string(),
            created_at: "2024-01-01 00:00:00".to_string(),
        };
        let author = user.author();
        assert_eq!(author.id, 7);
        assert_eq!(author.username, "leo");

        let json = serde_json::to_string(&author).unwrap();
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_new_user() {
        let new_user = NewUser::new("leo", "hash");
        assert_eq!(new_user.username, "leo");
        assert_eq!(new_user.password, "hash");
    }
}
