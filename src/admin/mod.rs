//! Administration module for Yatube.
//!
//! This module provides the operations behind the command line tools:
//! - User management (create, delete)
//! - Group management (create, delete)
//!
//! Deleting a user deletes their posts. Deleting a group keeps its posts,
//! which are left without a group.

mod group;
mod user;

use thiserror::Error;

use crate::auth::{PasswordError, ValidationError};
use crate::db::Database;

/// Admin-related errors.
#[derive(Error, Debug)]
pub enum AdminError {
    /// Target resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// The name is already taken.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Username rules violated.
    #[error("{0}")]
    Username(#[from] ValidationError),

    /// Password rules violated or hashing failed.
    #[error("{0}")]
    Password(#[from] PasswordError),

    /// General Yatube error.
    #[error("{0}")]
    Yatube(#[from] crate::YatubeError),
}

/// Service for administrative operations.
pub struct AdminService<'a> {
    db: &'a Database,
}

impl<'a> AdminService<'a> {
    /// Create a new AdminService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }
}
