//! News model
//!
//! This module defines the News entity and related input types. A news item
//! is owned by exactly one user and carries a set of category ids loaded
//! from the news_categories association table. The set is unordered;
//! repositories return it sorted for determinism.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// News entity representing a single post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    /// Unique identifier
    pub id: i64,
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Visible only to the owning user when set
    pub is_private: bool,
    /// Owning user ID
    pub user_id: i64,
    /// Associated category ids (sorted ascending)
    pub category_ids: Vec<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for creating or editing a news item.
///
/// On edit the full category set is replaced with `category_ids`, never
/// merged with the existing set.
#[derive(Debug, Clone)]
pub struct NewsDraft {
    pub title: String,
    pub content: String,
    pub is_private: bool,
    pub category_ids: Vec<i64>,
}

/// A news item joined with its author's display name, for feed rendering.
#[derive(Debug, Clone, Serialize)]
pub struct NewsFeedItem {
    #[serde(flatten)]
    pub news: News,
    pub author_name: String,
}
