// region:    --- Imports
use super::CacheStore;
use crate::clock::Clock;
use crate::error::CacheError;
use crate::query::queries;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

// endregion: --- Imports

// region:    --- Postgres Cache Store

/// listing_cache 테이블 기반 캐시 저장소 (여러 인스턴스가 공유)
pub struct PgCacheStore {
    pool: Arc<PgPool>,
    clock: Arc<dyn Clock>,
}

impl PgCacheStore {
    pub fn new(pool: Arc<PgPool>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl CacheStore for PgCacheStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError> {
        let value = sqlx::query_scalar::<_, serde_json::Value>(queries::GET_CACHE_ENTRY)
            .bind(key)
            .bind(self.clock.now())
            .fetch_optional(&*self.pool)
            .await?;
        Ok(value)
    }

    async fn set(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| CacheError::Store(format!("invalid ttl: {}", e)))?;
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .ok_or_else(|| CacheError::Store(format!("ttl out of range: {}", ttl)))?;
        sqlx::query(queries::SET_CACHE_ENTRY)
            .bind(key)
            .bind(&value)
            .bind(expires_at)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, CacheError> {
        let result = sqlx::query(queries::PURGE_CACHE_ENTRIES)
            .bind(self.clock.now())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// endregion: --- Postgres Cache Store
