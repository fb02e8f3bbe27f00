//! Almacenamiento PostgreSQL
//!
//! `PgStore` envuelve el pool de SQLx; las consultas de cada tabla viven en
//! su repositorio correspondiente.

use async_trait::async_trait;
use sqlx::PgPool;

use super::Store;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        tracing::info!("🗄️ Cerrando pool de conexiones");
        self.pool.close().await;
    }
}
