//! Repository layer
//!
//! Trait-based data access over the SQLite pool. Each repository pairs a
//! trait (the seam services depend on) with a `Sqlx*Repository`
//! implementation.

pub mod category;
pub mod news;
pub mod user;

pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use news::{NewsRepository, SqlxNewsRepository};
pub use user::{SqlxUserRepository, UserRepository};
