//! Category service

use crate::db::repositories::CategoryRepository;
use crate::models::Category;
use anyhow::Result;
use std::sync::Arc;

/// Category service backing the news form's category picker
pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    /// Create a new category service with the given repository
    pub fn new(category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self { category_repo }
    }

    /// List all categories ordered by name
    pub async fn list(&self) -> Result<Vec<Category>> {
        self.category_repo.list().await
    }
}
