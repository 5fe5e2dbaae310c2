//! Web middleware and shared state
//!
//! Authentication runs as route middleware: `require_auth` guards the
//! routes that need a logged-in user and redirects anonymous visitors to
//! the login page, `optional_auth` attaches the user when a valid session
//! cookie is present and lets the request through either way.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::models::User;
use crate::services::{CategoryService, NewsService, SessionManager, UserService};

use super::views::Views;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub news_service: Arc<NewsService>,
    pub category_service: Arc<CategoryService>,
    pub sessions: SessionManager,
    pub views: Arc<Views>,
}

impl AppState {
    /// Wire up every service over one pool.
    ///
    /// Fails only if a template does not compile.
    pub fn new(pool: sqlx::SqlitePool, secret: &str) -> anyhow::Result<Self> {
        use crate::db::repositories::{
            SqlxCategoryRepository, SqlxNewsRepository, SqlxUserRepository,
        };

        Ok(Self {
            user_service: Arc::new(UserService::new(SqlxUserRepository::boxed(pool.clone()))),
            news_service: Arc::new(NewsService::new(SqlxNewsRepository::boxed(pool.clone()))),
            category_service: Arc::new(CategoryService::new(SqlxCategoryRepository::boxed(pool))),
            sessions: SessionManager::new(secret),
            views: Arc::new(Views::new()?),
        })
    }
}

/// Authenticated user extracted from the session cookie
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Viewer attached by `optional_auth`; `None` means anonymous
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

/// Error type for the server-rendered pages
#[derive(Debug)]
pub enum WebError {
    NotFound,
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for WebError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => {
                (StatusCode::NOT_FOUND, Html("<h1>404 Not Found</h1>".to_string())).into_response()
            }
            Self::Internal(err) => {
                tracing::error!("Request failed: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>500 Internal Server Error</h1>".to_string()),
                )
                    .into_response()
            }
        }
    }
}

/// Error response for the JSON API
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("API request failed: {:#}", err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Extract the session token from the request's cookies
fn extract_session_token(request: &Request) -> Option<String> {
    let cookie_header = request.headers().get(header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some(token) = cookie.strip_prefix("session=") {
            return Some(token.to_string());
        }
    }

    None
}

/// Resolve a session token to a user, if possible.
///
/// Takes the token by value so the middleware futures never hold a
/// borrow of the request body across an await. A missing cookie, an
/// invalid or expired token, and a token whose user has since been
/// deleted all resolve to anonymous.
async fn current_user(state: &AppState, token: Option<String>) -> Option<User> {
    let token = token?;
    let user_id = state.sessions.verify(&token)?;

    match state.user_service.get_by_id(user_id).await {
        Ok(user) => user,
        Err(err) => {
            tracing::error!("Failed to load session user: {:#}", err);
            None
        }
    }
}

/// Authentication middleware: anonymous requests are sent to the login page
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_session_token(&request);
    match current_user(&state, token).await {
        Some(user) => {
            request.extensions_mut().insert(AuthenticatedUser(user));
            next.run(request).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// Optional authentication middleware
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_session_token(&request);
    let user = current_user(&state, token).await;
    request.extensions_mut().insert(MaybeUser(user));
    next.run(request).await
}
