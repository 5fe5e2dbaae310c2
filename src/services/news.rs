//! News service
//!
//! Visibility and ownership rules for news posts. The feed shows public
//! posts to everyone and additionally the viewer's own private posts;
//! create, edit, and delete always operate through ownership-scoped
//! repository calls.

use crate::db::repositories::NewsRepository;
use crate::models::{News, NewsDraft, NewsFeedItem};
use anyhow::Result;
use std::sync::Arc;

/// News service for managing posts
pub struct NewsService {
    news_repo: Arc<dyn NewsRepository>,
}

impl NewsService {
    /// Create a new news service with the given repository
    pub fn new(news_repo: Arc<dyn NewsRepository>) -> Self {
        Self { news_repo }
    }

    /// The home feed for an optional viewer.
    ///
    /// Anonymous visitors see public posts only; a logged-in viewer also
    /// sees their own private posts, never anyone else's.
    pub async fn feed(&self, viewer: Option<i64>) -> Result<Vec<NewsFeedItem>> {
        match viewer {
            Some(user_id) => self.news_repo.list_visible_to(user_id).await,
            None => self.news_repo.list_public().await,
        }
    }

    /// Create a post owned by `user_id`
    pub async fn create(&self, user_id: i64, draft: NewsDraft) -> Result<News> {
        let news = self.news_repo.create(user_id, &draft).await?;
        tracing::info!(news_id = news.id, user_id, "Created news post");
        Ok(news)
    }

    /// Load a post for editing, only if `user_id` owns it
    pub async fn get_for_edit(&self, id: i64, user_id: i64) -> Result<Option<News>> {
        self.news_repo.get_owned(id, user_id).await
    }

    /// Update a post owned by `user_id`, replacing its category set.
    ///
    /// Returns false when the post does not exist or belongs to someone
    /// else; the two cases are indistinguishable to the caller.
    pub async fn update(&self, id: i64, user_id: i64, draft: NewsDraft) -> Result<bool> {
        let updated = self.news_repo.update_owned(id, user_id, &draft).await?;
        if updated {
            tracing::info!(news_id = id, user_id, "Updated news post");
        }
        Ok(updated)
    }

    /// Delete a post owned by `user_id`.
    ///
    /// Returns false when the post does not exist or belongs to someone
    /// else.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<bool> {
        let deleted = self.news_repo.delete_owned(id, user_id).await?;
        if deleted {
            tracing::info!(news_id = id, user_id, "Deleted news post");
        }
        Ok(deleted)
    }

    /// Get a post by ID regardless of privacy or ownership
    pub async fn get(&self, id: i64) -> Result<Option<News>> {
        self.news_repo.get_by_id(id).await
    }

    /// List every post regardless of privacy or ownership
    pub async fn list_all(&self) -> Result<Vec<News>> {
        self.news_repo.list_all().await
    }
}
