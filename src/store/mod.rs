// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::WriteError;
use crate::listing::{ListingKind, ListingRecord};
use crate::query::queries;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Listing Writer Trait

/// 목록 레코드 쓰기 (동기화 측이 호출)
#[async_trait]
pub trait ListingWriter: Send + Sync {
    async fn write_listing_record(
        &self,
        kind: ListingKind,
        record: &ListingRecord,
    ) -> Result<(), WriteError>;

    /// 삭제된 행이 있으면 true
    async fn delete_listing_record(&self, kind: ListingKind, id: i64) -> Result<bool, WriteError>;
}

/// 쓰기 전 레코드 검증
pub fn validate_record(kind: ListingKind, record: &ListingRecord) -> Result<(), WriteError> {
    if record.id <= 0 {
        return Err(WriteError::Invalid {
            id: record.id,
            reason: "id must be positive",
        });
    }
    if kind == ListingKind::Items && record.parent_id <= 0 {
        return Err(WriteError::Invalid {
            id: record.id,
            reason: "item must belong to an auction",
        });
    }
    Ok(())
}

// endregion: --- Listing Writer Trait

// region:    --- Postgres Listing Writer

pub struct PgListingWriter {
    db_manager: Arc<DatabaseManager>,
}

impl PgListingWriter {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

#[async_trait]
impl ListingWriter for PgListingWriter {
    async fn write_listing_record(
        &self,
        kind: ListingKind,
        record: &ListingRecord,
    ) -> Result<(), WriteError> {
        validate_record(kind, record)?;
        info!(
            "{:<12} --> {} 레코드 저장 id: {}",
            "Writer",
            kind.as_str(),
            record.id
        );

        let sql = queries::upsert_record(kind);
        let record = record.clone();
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query(&sql)
                        .bind(record.id)
                        .bind(record.parent_id)
                        .bind(record.owner_id)
                        .bind(record.status.code())
                        .bind(record.starts_at)
                        .bind(record.ends_at)
                        // BIGINT 범위를 넘는 키는 최대값으로 저장
                        .bind(i64::try_from(record.lot_sort_key).unwrap_or(i64::MAX))
                        .bind(&record.location_country)
                        .bind(&record.location_subdivision)
                        .bind(&record.location_city)
                        .bind(&record.search_text)
                        .bind(record.created_at)
                        .execute(&mut **tx)
                        .await?;
                    Ok::<(), WriteError>(())
                })
            })
            .await
    }

    async fn delete_listing_record(&self, kind: ListingKind, id: i64) -> Result<bool, WriteError> {
        info!("{:<12} --> {} 레코드 삭제 id: {}", "Writer", kind.as_str(), id);
        let result = sqlx::query(&queries::delete_record(kind))
            .bind(id)
            .execute(&*self.db_manager.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// endregion: --- Postgres Listing Writer
