//! Group model for Yatube.
//!
//! A group is a topic that posts may optionally belong to. Groups are
//! addressed in URLs by their slug.

use std::fmt;

use serde::Serialize;

/// Maximum length of a group title (in characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of a group slug (in characters).
pub const MAX_SLUG_LENGTH: usize = 50;

/// Group entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Group {
    /// Unique group ID.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Unique URL identifier.
    pub slug: String,
    /// Free-form description.
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Data for creating a new group.
#[derive(Debug, Clone)]
pub struct NewGroup {
    /// Display title.
    pub title: String,
    /// Unique URL identifier.
    pub slug: String,
    /// Free-form description.
    pub description: String,
}

impl NewGroup {
    /// Create a new group with an empty description.
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Check that a slug is usable in URLs: 1..=50 of ASCII letters, digits, `-` and `_`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.chars().count() <= MAX_SLUG_LENGTH
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_displays_as_title() {
        let group = Group {
            id: 1,
            title: "Cats".to_string(),
            slug: "cats".to_string(),
            description: String::new(),
        };
        assert_eq!(group.to_string(), "Cats");
    }

    #[test]
    fn test_new_group_builder() {
        let group = NewGroup::new("cats", "Cats").with_description("All about cats");
        assert_eq!(group.slug, "cats");
        assert_eq!(group.title, "Cats");
        assert_eq!(group.description, "All about cats");
    }

    #[test]
    fn test_valid_slugs() {
        assert!(is_valid_slug("cats"));
        assert!(is_valid_slug("test-slug_2"));
        assert!(is_valid_slug(&"a".repeat(MAX_SLUG_LENGTH)));
    }

    #[test]
    fn test_invalid_slugs() {
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("slash/slug"));
        assert!(!is_valid_slug("кошки"));
        assert!(!is_valid_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)));
    }
}
