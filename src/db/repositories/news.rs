//! News repository
//!
//! Database operations for news posts and their category associations.
//!
//! Create and update run inside a single transaction so the news row and
//! its association set commit or roll back together. Ownership checks are
//! expressed as equality filters in the SQL itself (`id = ? AND
//! user_id = ?`), never inferred from previously loaded rows.

use crate::models::{News, NewsDraft, NewsFeedItem};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use std::sync::Arc;

/// News repository trait
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Create a news post owned by `user_id`, attaching the draft's
    /// categories, atomically.
    async fn create(&self, user_id: i64, draft: &NewsDraft) -> Result<News>;

    /// Get a news post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<News>>;

    /// Get a news post by ID, only if owned by `user_id`
    async fn get_owned(&self, id: i64, user_id: i64) -> Result<Option<News>>;

    /// Overwrite title/content/privacy and replace the category set of a
    /// post owned by `user_id`. Returns false if no such post exists.
    async fn update_owned(&self, id: i64, user_id: i64, draft: &NewsDraft) -> Result<bool>;

    /// Delete a post owned by `user_id`. Returns false if no such post
    /// exists.
    async fn delete_owned(&self, id: i64, user_id: i64) -> Result<bool>;

    /// List non-private posts, newest first
    async fn list_public(&self) -> Result<Vec<NewsFeedItem>>;

    /// List posts visible to `user_id` (non-private or own), newest first
    async fn list_visible_to(&self, user_id: i64) -> Result<Vec<NewsFeedItem>>;

    /// List every post regardless of privacy, newest first
    async fn list_all(&self) -> Result<Vec<News>>;
}

/// SQLx-based news repository implementation
pub struct SqlxNewsRepository {
    pool: SqlitePool,
}

impl SqlxNewsRepository {
    /// Create a new SQLx news repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn NewsRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NewsRepository for SqlxNewsRepository {
    async fn create(&self, user_id: i64, draft: &NewsDraft) -> Result<News> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let result = sqlx::query(
            r#"
            INSERT INTO news (title, content, is_private, user_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.is_private)
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("Failed to create news")?;

        let id = result.last_insert_rowid();

        attach_categories(&mut tx, id, &draft.category_ids).await?;
        let category_ids = category_ids_in_tx(&mut tx, id).await?;

        tx.commit().await.context("Failed to commit news creation")?;

        Ok(News {
            id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            is_private: draft.is_private,
            user_id,
            category_ids,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<News>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, content, is_private, user_id, created_at
            FROM news
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get news by ID")?;

        match row {
            Some(row) => {
                let mut news = row_to_news(&row);
                news.category_ids = self.load_category_ids(news.id).await?;
                Ok(Some(news))
            }
            None => Ok(None),
        }
    }

    async fn get_owned(&self, id: i64, user_id: i64) -> Result<Option<News>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, content, is_private, user_id, created_at
            FROM news
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get owned news")?;

        match row {
            Some(row) => {
                let mut news = row_to_news(&row);
                news.category_ids = self.load_category_ids(news.id).await?;
                Ok(Some(news))
            }
            None => Ok(None),
        }
    }

    async fn update_owned(&self, id: i64, user_id: i64, draft: &NewsDraft) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let result = sqlx::query(
            r#"
            UPDATE news
            SET title = ?, content = ?, is_private = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.is_private)
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("Failed to update news")?;

        if result.rows_affected() == 0 {
            // Not found or not owned; dropping the transaction rolls back.
            return Ok(false);
        }

        // Replace the association set: clear and re-insert, never diff.
        sqlx::query("DELETE FROM news_categories WHERE news_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear news categories")?;

        attach_categories(&mut tx, id, &draft.category_ids).await?;

        tx.commit().await.context("Failed to commit news update")?;

        Ok(true)
    }

    async fn delete_owned(&self, id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM news WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete news")?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_public(&self) -> Result<Vec<NewsFeedItem>> {
        let rows = sqlx::query(
            r#"
            SELECT n.id, n.title, n.content, n.is_private, n.user_id, n.created_at,
                   u.name AS author_name
            FROM news n
            JOIN users u ON u.id = n.user_id
            WHERE n.is_private = 0
            ORDER BY n.created_at DESC, n.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list public news")?;

        self.rows_to_feed(rows).await
    }

    async fn list_visible_to(&self, user_id: i64) -> Result<Vec<NewsFeedItem>> {
        let rows = sqlx::query(
            r#"
            SELECT n.id, n.title, n.content, n.is_private, n.user_id, n.created_at,
                   u.name AS author_name
            FROM news n
            JOIN users u ON u.id = n.user_id
            WHERE n.is_private = 0 OR n.user_id = ?
            ORDER BY n.created_at DESC, n.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list visible news")?;

        self.rows_to_feed(rows).await
    }

    async fn list_all(&self) -> Result<Vec<News>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, is_private, user_id, created_at
            FROM news
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list news")?;

        let mut items: Vec<News> = rows.iter().map(row_to_news).collect();
        let ids: Vec<i64> = items.iter().map(|n| n.id).collect();
        let mut map = self.load_category_map(&ids).await?;
        for news in &mut items {
            news.category_ids = map.remove(&news.id).unwrap_or_default();
        }

        Ok(items)
    }
}

impl SqlxNewsRepository {
    async fn load_category_ids(&self, news_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT category_id FROM news_categories WHERE news_id = ? ORDER BY category_id",
        )
        .bind(news_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load news categories")?;

        Ok(ids)
    }

    async fn load_category_map(&self, news_ids: &[i64]) -> Result<HashMap<i64, Vec<i64>>> {
        if news_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; news_ids.len()].join(", ");
        let sql = format!(
            "SELECT news_id, category_id FROM news_categories \
             WHERE news_id IN ({placeholders}) ORDER BY category_id"
        );

        let mut query = sqlx::query(&sql);
        for id in news_ids {
            query = query.bind(id);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to load news category map")?;

        let mut map: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in rows {
            map.entry(row.get("news_id"))
                .or_default()
                .push(row.get("category_id"));
        }

        Ok(map)
    }

    async fn rows_to_feed(&self, rows: Vec<sqlx::sqlite::SqliteRow>) -> Result<Vec<NewsFeedItem>> {
        let mut items: Vec<NewsFeedItem> = rows
            .iter()
            .map(|row| NewsFeedItem {
                news: row_to_news(row),
                author_name: row.get("author_name"),
            })
            .collect();

        let ids: Vec<i64> = items.iter().map(|i| i.news.id).collect();
        let mut map = self.load_category_map(&ids).await?;
        for item in &mut items {
            item.news.category_ids = map.remove(&item.news.id).unwrap_or_default();
        }

        Ok(items)
    }
}

/// Attach categories to a news row inside a transaction.
///
/// Inserting through a SELECT over the categories table keeps the stored
/// set a subset of existing category rows; unknown ids are dropped rather
/// than rejected, matching the edit form's multi-select semantics.
async fn attach_categories(
    tx: &mut Transaction<'_, Sqlite>,
    news_id: i64,
    category_ids: &[i64],
) -> Result<()> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let placeholders = vec!["?"; category_ids.len()].join(", ");
    let sql = format!(
        "INSERT OR IGNORE INTO news_categories (news_id, category_id) \
         SELECT ?, id FROM categories WHERE id IN ({placeholders})"
    );

    let mut query = sqlx::query(&sql).bind(news_id);
    for id in category_ids {
        query = query.bind(id);
    }

    query
        .execute(&mut **tx)
        .await
        .context("Failed to attach categories")?;

    Ok(())
}

async fn category_ids_in_tx(tx: &mut Transaction<'_, Sqlite>, news_id: i64) -> Result<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT category_id FROM news_categories WHERE news_id = ? ORDER BY category_id",
    )
    .bind(news_id)
    .fetch_all(&mut **tx)
    .await
    .context("Failed to load news categories")?;

    Ok(ids)
}

fn row_to_news(row: &sqlx::sqlite::SqliteRow) -> News {
    News {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        is_private: row.get("is_private"),
        user_id: row.get("user_id"),
        category_ids: Vec::new(),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{CategoryRepository, SqlxCategoryRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Category, User};

    struct TestDb {
        news: SqlxNewsRepository,
        users: SqlxUserRepository,
        categories: SqlxCategoryRepository,
    }

    async fn setup() -> TestDb {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        TestDb {
            news: SqlxNewsRepository::new(pool.clone()),
            users: SqlxUserRepository::new(pool.clone()),
            categories: SqlxCategoryRepository::new(pool),
        }
    }

    async fn create_user(db: &TestDb, name: &str) -> User {
        db.users
            .create(&User::new(
                name.to_string(),
                format!("{}@example.com", name.to_lowercase()),
                "hash".to_string(),
                None,
            ))
            .await
            .expect("Failed to create user")
    }

    async fn create_category(db: &TestDb, name: &str) -> Category {
        db.categories
            .create(&Category::new(name.to_string()))
            .await
            .expect("Failed to create category")
    }

    fn draft(title: &str, is_private: bool, category_ids: Vec<i64>) -> NewsDraft {
        NewsDraft {
            title: title.to_string(),
            content: format!("{} content", title),
            is_private,
            category_ids,
        }
    }

    #[tokio::test]
    async fn test_create_news_with_categories() {
        let db = setup().await;
        let user = create_user(&db, "Alice").await;
        let cat_a = create_category(&db, "Politics").await;
        let cat_b = create_category(&db, "Tech").await;

        let news = db
            .news
            .create(user.id, &draft("First", false, vec![cat_a.id, cat_b.id]))
            .await
            .expect("Failed to create news");

        assert!(news.id > 0);
        assert_eq!(news.user_id, user.id);
        assert_eq!(news.category_ids, vec![cat_a.id, cat_b.id]);
    }

    #[tokio::test]
    async fn test_create_drops_unknown_category_ids() {
        let db = setup().await;
        let user = create_user(&db, "Alice").await;
        let cat = create_category(&db, "Politics").await;

        let news = db
            .news
            .create(user.id, &draft("First", false, vec![cat.id, 9999]))
            .await
            .expect("Failed to create news");

        assert_eq!(news.category_ids, vec![cat.id]);
    }

    #[tokio::test]
    async fn test_get_owned_filters_by_owner() {
        let db = setup().await;
        let alice = create_user(&db, "Alice").await;
        let bob = create_user(&db, "Bob").await;

        let news = db
            .news
            .create(alice.id, &draft("Mine", false, vec![]))
            .await
            .expect("Failed to create news");

        assert!(db
            .news
            .get_owned(news.id, alice.id)
            .await
            .expect("Failed to get")
            .is_some());
        assert!(db
            .news
            .get_owned(news.id, bob.id)
            .await
            .expect("Failed to get")
            .is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_category_set() {
        let db = setup().await;
        let user = create_user(&db, "Alice").await;
        let cat_a = create_category(&db, "A").await;
        let cat_b = create_category(&db, "B").await;
        let cat_c = create_category(&db, "C").await;

        let news = db
            .news
            .create(user.id, &draft("Post", false, vec![cat_a.id, cat_b.id]))
            .await
            .expect("Failed to create news");

        let updated = db
            .news
            .update_owned(news.id, user.id, &draft("Post", false, vec![cat_c.id]))
            .await
            .expect("Failed to update news");
        assert!(updated);

        let reloaded = db
            .news
            .get_by_id(news.id)
            .await
            .expect("Failed to reload")
            .expect("News missing");

        // Exactly {C}, never {A, B, C}
        assert_eq!(reloaded.category_ids, vec![cat_c.id]);
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let db = setup().await;
        let user = create_user(&db, "Alice").await;

        let news = db
            .news
            .create(user.id, &draft("Old title", false, vec![]))
            .await
            .expect("Failed to create news");

        db.news
            .update_owned(news.id, user.id, &draft("New title", true, vec![]))
            .await
            .expect("Failed to update news");

        let reloaded = db
            .news
            .get_by_id(news.id)
            .await
            .expect("Failed to reload")
            .expect("News missing");

        assert_eq!(reloaded.title, "New title");
        assert!(reloaded.is_private);
    }

    #[tokio::test]
    async fn test_update_by_non_owner_returns_false() {
        let db = setup().await;
        let alice = create_user(&db, "Alice").await;
        let bob = create_user(&db, "Bob").await;

        let news = db
            .news
            .create(alice.id, &draft("Post", false, vec![]))
            .await
            .expect("Failed to create news");

        let updated = db
            .news
            .update_owned(news.id, bob.id, &draft("Hacked", false, vec![]))
            .await
            .expect("Update should not error");
        assert!(!updated);

        let reloaded = db
            .news
            .get_by_id(news.id)
            .await
            .expect("Failed to reload")
            .expect("News missing");
        assert_eq!(reloaded.title, "Post");
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let db = setup().await;
        let user = create_user(&db, "Alice").await;
        let other = db
            .news
            .create(user.id, &draft("Keep me", false, vec![]))
            .await
            .expect("Failed to create news");
        let news = db
            .news
            .create(user.id, &draft("Delete me", false, vec![]))
            .await
            .expect("Failed to create news");

        let first = db
            .news
            .delete_owned(news.id, user.id)
            .await
            .expect("Failed to delete");
        let second = db
            .news
            .delete_owned(news.id, user.id)
            .await
            .expect("Second delete should not error");

        assert!(first);
        assert!(!second);

        // No other row was altered
        assert!(db
            .news
            .get_by_id(other.id)
            .await
            .expect("Failed to get")
            .is_some());
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_returns_false() {
        let db = setup().await;
        let alice = create_user(&db, "Alice").await;
        let bob = create_user(&db, "Bob").await;

        let news = db
            .news
            .create(alice.id, &draft("Post", false, vec![]))
            .await
            .expect("Failed to create news");

        let deleted = db
            .news
            .delete_owned(news.id, bob.id)
            .await
            .expect("Delete should not error");
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_list_public_excludes_private() {
        let db = setup().await;
        let user = create_user(&db, "Alice").await;
        db.news
            .create(user.id, &draft("Public", false, vec![]))
            .await
            .expect("Failed to create news");
        db.news
            .create(user.id, &draft("Private", true, vec![]))
            .await
            .expect("Failed to create news");

        let feed = db.news.list_public().await.expect("Failed to list");
        let titles: Vec<&str> = feed.iter().map(|i| i.news.title.as_str()).collect();

        assert_eq!(titles, vec!["Public"]);
        assert_eq!(feed[0].author_name, "Alice");
    }

    #[tokio::test]
    async fn test_list_visible_includes_own_private_only() {
        let db = setup().await;
        let alice = create_user(&db, "Alice").await;
        let bob = create_user(&db, "Bob").await;
        db.news
            .create(alice.id, &draft("Alice public", false, vec![]))
            .await
            .expect("Failed to create news");
        db.news
            .create(alice.id, &draft("Alice private", true, vec![]))
            .await
            .expect("Failed to create news");
        db.news
            .create(bob.id, &draft("Bob private", true, vec![]))
            .await
            .expect("Failed to create news");

        let feed = db
            .news
            .list_visible_to(alice.id)
            .await
            .expect("Failed to list");
        let mut titles: Vec<&str> = feed.iter().map(|i| i.news.title.as_str()).collect();
        titles.sort();

        assert_eq!(titles, vec!["Alice private", "Alice public"]);
    }

    #[tokio::test]
    async fn test_list_all_includes_private() {
        let db = setup().await;
        let user = create_user(&db, "Alice").await;
        let cat = create_category(&db, "Politics").await;
        db.news
            .create(user.id, &draft("Public", false, vec![cat.id]))
            .await
            .expect("Failed to create news");
        db.news
            .create(user.id, &draft("Private", true, vec![]))
            .await
            .expect("Failed to create news");

        let all = db.news.list_all().await.expect("Failed to list");

        assert_eq!(all.len(), 2);
        let public = all.iter().find(|n| n.title == "Public").expect("missing");
        assert_eq!(public.category_ids, vec![cat.id]);
    }
}
