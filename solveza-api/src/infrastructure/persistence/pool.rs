//! 连接池与数据库迁移

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::DatabaseSettings;

/// 按配置创建连接池
pub async fn connect_pool(settings: &DatabaseSettings) -> Result<Arc<PgPool>> {
    let mut options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_seconds));
    if let Some(min) = settings.min_connections {
        options = options.min_connections(min);
    }

    let pool = options
        .connect(&settings.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!(
        max_connections = settings.max_connections,
        "PostgreSQL connection pool established"
    );
    Ok(Arc::new(pool))
}

/// 执行 `migrations/` 下尚未应用的迁移
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");
    Ok(())
}
