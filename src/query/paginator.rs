// region:    --- Imports
use super::queries::Scope;
use super::repository::PartitionRepository;
use crate::cache::{cache_key, CacheSlot, ResultCache};
use crate::error::RepositoryError;
use crate::listing::{FilterSet, ListingKind};
use futures_util::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

// endregion: --- Imports

// region:    --- Slice Planning

/// 범위 하나에 대한 LIMIT/OFFSET 요청
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceRequest {
    pub scope: Scope,
    pub limit: u64,
    pub offset: u64,
}

/// 전역 (offset, limit)을 범위별 구간으로 나눈다.
///
/// 오프셋이 범위 전체를 넘는 범위와 빈 범위는 쿼리하지 않는다.
pub fn plan_slices(scopes: &[Scope], counts: &[u64], offset: u64, limit: u64) -> Vec<SliceRequest> {
    let mut slices = Vec::new();
    let mut remaining_offset = offset;
    let mut remaining_limit = limit;

    for (scope, count) in scopes.iter().zip(counts) {
        if remaining_limit == 0 {
            break;
        }
        if remaining_offset >= *count {
            remaining_offset -= count;
            continue;
        }

        let take = remaining_limit.min(count - remaining_offset);
        slices.push(SliceRequest {
            scope: *scope,
            limit: take,
            offset: remaining_offset,
        });
        remaining_limit -= take;
        remaining_offset = 0;
    }

    slices
}

// endregion: --- Slice Planning

// region:    --- Cross-Partition Paginator

/// 한 페이지의 id 목록과 전체 행 수
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIds {
    pub ids: Vec<i64>,
    pub total: u64,
}

/// 파티션을 가로지르는 페이지 계산기 (엔티티 종류 하나당 하나)
pub struct Paginator {
    kind: ListingKind,
    repository: Arc<dyn PartitionRepository>,
    cache: ResultCache,
    id_ttl: Duration,
    count_ttl: Duration,
}

impl Paginator {
    pub fn new(
        kind: ListingKind,
        repository: Arc<dyn PartitionRepository>,
        cache: ResultCache,
        id_ttl: Duration,
        count_ttl: Duration,
    ) -> Self {
        Self {
            kind,
            repository,
            cache,
            id_ttl,
            count_ttl,
        }
    }

    /// 필터 셋의 페이지 id 목록 계산
    pub async fn page(&self, filters: &FilterSet) -> Result<PageIds, RepositoryError> {
        let scopes = Scope::plan(filters);
        let counts = self.partition_counts(filters, &scopes).await?;
        let total: u64 = counts.iter().sum();

        let ids_key = cache_key(self.kind, CacheSlot::Ids, filters);
        let ids: Vec<i64> = self
            .cache
            .get_or_compute(&ids_key, self.id_ttl, || {
                self.fetch_slices(filters, &scopes, &counts)
            })
            .await?;

        Ok(PageIds { ids, total })
    }

    /// 범위별 행 수 (캐시 우선, 미스 시 동시 조회)
    async fn partition_counts(
        &self,
        filters: &FilterSet,
        scopes: &[Scope],
    ) -> Result<Vec<u64>, RepositoryError> {
        let key = cache_key(self.kind, CacheSlot::Counts, filters);
        self.cache
            .get_or_compute(&key, self.count_ttl, || async {
                let counts = try_join_all(
                    scopes
                        .iter()
                        .map(|scope| self.repository.count_partition(filters, *scope)),
                )
                .await?;
                debug!(
                    "{:<12} --> {} 파티션 카운트: {:?}",
                    "Paginator",
                    self.kind.as_str(),
                    counts
                );
                Ok::<_, RepositoryError>(counts)
            })
            .await
    }

    /// 계획된 구간을 동시에 조회한 뒤 범위 우선순위 순으로 이어붙인다.
    async fn fetch_slices(
        &self,
        filters: &FilterSet,
        scopes: &[Scope],
        counts: &[u64],
    ) -> Result<Vec<i64>, RepositoryError> {
        let slices = plan_slices(
            scopes,
            counts,
            filters.offset(),
            u64::from(filters.per_page),
        );
        debug!(
            "{:<12} --> {} page={} slices={:?}",
            "Paginator",
            self.kind.as_str(),
            filters.page,
            slices
        );

        let parts = try_join_all(slices.iter().map(|slice| {
            self.repository
                .fetch_partition(filters, slice.scope, slice.limit, slice.offset)
        }))
        .await?;

        Ok(parts.into_iter().flatten().collect())
    }
}

// endregion: --- Cross-Partition Paginator
