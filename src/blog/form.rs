//! Post submission form.
//!
//! [`PostForm`] is what the browser sends; [`PostForm::clean`] turns it into
//! either a [`CleanedPost`] ready to persist or [`FormErrors`] to show next to
//! the offending fields.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use super::post::Post;

/// Texts of this many characters or fewer are rejected.
pub const MIN_TEXT_LENGTH: usize = 10;

/// Message for an empty text.
pub const TEXT_REQUIRED_MESSAGE: &str = "fill in the text field!";

/// Message for a text of at most [`MIN_TEXT_LENGTH`] characters.
pub const TEXT_TOO_SHORT_MESSAGE: &str = "post volume is too small";

/// Message for a group value that is not one of the offered groups.
pub const INVALID_GROUP_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Validate a post body.
///
/// The empty-text check runs first so that it keeps its own message even
/// though an empty text is also too short.
pub fn validate_text(text: &str) -> Result<&str, ValidationError> {
    if text.is_empty() {
        return Err(
            ValidationError::new("required").with_message(Cow::Borrowed(TEXT_REQUIRED_MESSAGE))
        );
    }
    if text.chars().count() <= MIN_TEXT_LENGTH {
        return Err(
            ValidationError::new("min_length").with_message(Cow::Borrowed(TEXT_TOO_SHORT_MESSAGE))
        );
    }
    Ok(text)
}

fn text_rules(text: &str) -> Result<(), ValidationError> {
    validate_text(text).map(|_| ())
}

fn group_choice(group: &str) -> Result<(), ValidationError> {
    if group.is_empty() || group.parse::<i64>().is_ok() {
        Ok(())
    } else {
        Err(invalid_group())
    }
}

fn invalid_group() -> ValidationError {
    ValidationError::new("invalid_choice").with_message(Cow::Borrowed(INVALID_GROUP_MESSAGE))
}

/// A submitted post form (create and edit share it).
///
/// Missing fields deserialize as empty strings; an empty `group` means
/// "no group".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct PostForm {
    #[serde(default)]
    #[validate(custom(function = "text_rules"))]
    pub text: String,
    #[serde(default)]
    #[validate(custom(function = "group_choice"))]
    pub group: String,
}

impl PostForm {
    /// Form pre-filled with the current values of a post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    /// Selected group id, if the value is a number.
    pub fn group_id(&self) -> Option<i64> {
        self.group.trim().parse().ok()
    }

    /// Apply the field rules.
    ///
    /// Surrounding whitespace of the text is stripped before it is checked
    /// and stored. Whether the selected group exists is left to the caller,
    /// which owns the database.
    pub fn clean(&self) -> Result<CleanedPost, FormErrors> {
        let trimmed = Self {
            text: self.text.trim().to_string(),
            group: self.group.trim().to_string(),
        };
        trimmed.validate()?;

        let group_id = trimmed.group_id();
        Ok(CleanedPost {
            text: trimmed.text,
            group_id,
        })
    }
}

/// Validated post data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<i64>,
}

/// Field name to error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// No errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a message to a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages for a field (empty when the field is fine).
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The error for an unknown group id.
    pub fn invalid_group() -> Self {
        let mut errors = Self::new();
        errors.add("group", INVALID_GROUP_MESSAGE);
        errors
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                form_errors.add(field.to_string(), message);
            }
        }
        form_errors
    }
}
