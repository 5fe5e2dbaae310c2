//! Newsroom - a small multi-user news blog
//!
//! This library provides the core functionality for the newsroom blog system.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
