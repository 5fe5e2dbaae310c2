//! Newsroom server entry point

use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use newsroom::api::{build_router, AppState};
use newsroom::config::Config;
use newsroom::db::{self, migrations};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsroom=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(Path::new("config.yml")).context("Failed to load configuration")?;

    let pool = db::create_pool(&config.database)
        .await
        .context("Failed to open database")?;

    migrations::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let state = AppState::new(pool, &config.server.secret_key)?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
