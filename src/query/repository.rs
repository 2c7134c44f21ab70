// region:    --- Imports
use super::queries::{self, Projection, Scope};
use crate::clock::Clock;
use crate::error::RepositoryError;
use crate::listing::{FilterSet, ListingKind};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error};

// endregion: --- Imports

// region:    --- Partition Repository Trait

/// 엔티티 종류별 파티션 조회 능력
///
/// 구현체는 저장소의 정렬/LIMIT 기능으로 요청된 구간만 읽어야 한다.
#[async_trait]
pub trait PartitionRepository: Send + Sync {
    /// 범위에 속하는 행 수
    async fn count_partition(
        &self,
        filters: &FilterSet,
        scope: Scope,
    ) -> Result<u64, RepositoryError>;

    /// 범위 정렬 순서대로 `offset`부터 최대 `limit`개의 id
    async fn fetch_partition(
        &self,
        filters: &FilterSet,
        scope: Scope,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<i64>, RepositoryError>;
}

// endregion: --- Partition Repository Trait

// region:    --- Postgres Partition Repository

/// Postgres 파티션 저장소 (엔티티 종류 하나당 하나)
pub struct PgPartitionRepository {
    pool: Arc<PgPool>,
    kind: ListingKind,
    clock: Arc<dyn Clock>,
}

impl PgPartitionRepository {
    pub fn new(pool: Arc<PgPool>, kind: ListingKind, clock: Arc<dyn Clock>) -> Self {
        Self { pool, kind, clock }
    }
}

#[async_trait]
impl PartitionRepository for PgPartitionRepository {
    async fn count_partition(
        &self,
        filters: &FilterSet,
        scope: Scope,
    ) -> Result<u64, RepositoryError> {
        // 하위 쿼리마다 현재 시각을 새로 읽는다
        let now = self.clock.unix_now();
        let mut qb = queries::partition_query(self.kind, filters, scope, now, Projection::Count);
        debug!(
            "{:<12} --> count {} {:?}: {}",
            "Repository",
            self.kind.as_str(),
            scope,
            qb.sql()
        );

        let count: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| {
                error!("{:<12} --> 파티션 카운트 실패: {:?}", "Repository", e);
                RepositoryError::from(e)
            })?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn fetch_partition(
        &self,
        filters: &FilterSet,
        scope: Scope,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<i64>, RepositoryError> {
        let now = self.clock.unix_now();
        let mut qb = queries::partition_query(
            self.kind,
            filters,
            scope,
            now,
            Projection::Ids { limit, offset },
        );
        debug!(
            "{:<12} --> fetch {} {:?} limit={} offset={}",
            "Repository",
            self.kind.as_str(),
            scope,
            limit,
            offset
        );

        qb.build_query_scalar::<i64>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| {
                error!("{:<12} --> 파티션 조회 실패: {:?}", "Repository", e);
                RepositoryError::from(e)
            })
    }
}

// endregion: --- Postgres Partition Repository
