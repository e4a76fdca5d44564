use anyhow::Context;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{config::AppConfig, error::ApiError, state::AppState};

/// Connects and migrates when persistence is configured; `None` otherwise.
pub async fn connect(config: &AppConfig) -> anyhow::Result<Option<PgPool>> {
    if !config.is_persistence_configured() {
        tracing::warn!("DATABASE_URL missing or placeholder; plan persistence disabled");
        return Ok(None);
    }
    let Some(url) = config.database_url.as_deref() else {
        return Ok(None);
    };

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run migrations")?;

    tracing::info!("plan persistence enabled");
    Ok(Some(db))
}

/// Pool handle for handlers that need persistence; rejects before any other
/// work when plan storage is disabled.
pub struct Db(pub PgPool);

#[async_trait]
impl FromRequestParts<AppState> for Db {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Db(state.db()?.clone()))
    }
}
