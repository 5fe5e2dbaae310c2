//! Service layer
//!
//! Business logic on top of the repository layer. Services own validation
//! and visibility rules; handlers stay thin.

pub mod category;
pub mod news;
pub mod password;
pub mod session;
pub mod user;

pub use category::CategoryService;
pub use news::NewsService;
pub use session::SessionManager;
pub use user::{RegisterInput, UserService, UserServiceError};
