//! User model
//!
//! This module defines the User entity for the newsroom blog system.
//! Passwords are stored only as a one-way argon2id hash; the plaintext is
//! never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a registered author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address (unique, used for login)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Short about-text shown on the profile
    pub about: Option<String>,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// The password must already be hashed; use
    /// `services::password::hash_password()`.
    pub fn new(name: String, email: String, password_hash: String, about: Option<String>) -> Self {
        Self {
            id: 0, // Will be set by the database
            name,
            email,
            password_hash,
            about,
            created_at: Utc::now(),
        }
    }
}
