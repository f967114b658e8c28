//! Authentication module for Yatube.
//!
//! This module provides password hashing, username rules and the signed
//! session tokens that carry a user's identity between requests.

mod password;
mod token;
pub mod validation;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use token::{Identity, SessionClaims, SessionTokens};
pub use validation::{validate_username, ValidationError, MAX_USERNAME_LENGTH};
