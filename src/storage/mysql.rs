use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::MySqlPool;

use crate::core::traits::HealthProbe;
use crate::core::{AppError, Result};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply pending schema migrations
pub async fn run_migrations(pool: &MySqlPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to run migrations: {}", e)))?;

    tracing::info!(migrations = MIGRATOR.iter().count(), "Database migrations applied");
    Ok(())
}

/// Readiness probe that round-trips `SELECT 1` through the pool
#[derive(Clone)]
pub struct MySqlHealthProbe {
    pool: MySqlPool,
}

impl MySqlHealthProbe {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthProbe for MySqlHealthProbe {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
