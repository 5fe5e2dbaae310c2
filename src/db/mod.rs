//! Database layer
//!
//! This module provides persistence for the newsroom blog system, backed by
//! a single SQLite file for single-binary deployment. The schema is created
//! on first run by embedded migrations.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
