//! Domain models for the newsroom blog system

pub mod category;
pub mod news;
pub mod user;

pub use category::Category;
pub use news::{News, NewsDraft, NewsFeedItem};
pub use user::User;
