//! Web layer - routing, handlers, and middleware
//!
//! Routes fall into three groups: the public pages (feed, login,
//! register), the pages that need a logged-in user (news create/edit/
//! delete, logout), and the read-only JSON API under `/api/v2`.

pub mod forms;
pub mod middleware;
pub mod news_api;
pub mod pages;
pub mod views;


use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState, WebError};
pub use views::Views;

/// Build the complete application router
pub fn build_router(state: AppState) -> Router {
    // Routes that require a logged-in user
    let protected = Router::new()
        .route(
            "/news",
            get(pages::news_create_page).post(pages::news_create_submit),
        )
        .route(
            "/news/{id}",
            get(pages::news_edit_page).post(pages::news_edit_submit),
        )
        .route(
            "/news_delete/{id}",
            get(pages::news_delete).post(pages::news_delete),
        )
        .route("/logout", get(pages::logout))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // The feed personalizes when a session cookie is present
    let home = Router::new()
        .route("/", get(pages::index))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::optional_auth,
        ));

    Router::new()
        .merge(home)
        .route("/login", get(pages::login_page).post(pages::login_submit))
        .route(
            "/register",
            get(pages::register_page).post(pages::register_submit),
        )
        .merge(protected)
        .nest("/api/v2", news_api::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
