// region:    --- Imports
use super::paginator::Paginator;
use crate::content::ContentStore;
use crate::error::ListingError;
use crate::listing::{EnrichedRow, FilterSet, ListingFilters, ListingKind, ListingPage};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Listing Service

/// 목록 조회 진입점
///
/// 필터 정규화 → 페이지 id 계산 → 콘텐츠 보강 순으로 처리한다.
/// 보강 단계는 페이지 계산기가 돌려준 id 순서를 그대로 유지한다.
pub struct ListingService {
    auctions: Paginator,
    items: Paginator,
    content: Arc<dyn ContentStore>,
}

impl ListingService {
    pub fn new(auctions: Paginator, items: Paginator, content: Arc<dyn ContentStore>) -> Self {
        Self {
            auctions,
            items,
            content,
        }
    }

    fn paginator(&self, kind: ListingKind) -> &Paginator {
        match kind {
            ListingKind::Auctions => &self.auctions,
            ListingKind::Items => &self.items,
        }
    }

    /// 목록 한 페이지 조회
    pub async fn list(
        &self,
        kind: ListingKind,
        filters: ListingFilters,
        page: i64,
        per_page: i64,
    ) -> Result<ListingPage, ListingError> {
        let filters = FilterSet::normalize(kind, filters, page, per_page);
        info!(
            "{:<12} --> {} 목록 조회 page={} per_page={} sort={:?} pinned={}",
            "Listing",
            kind.as_str(),
            filters.page,
            filters.per_page,
            filters.sort,
            filters.is_pinned()
        );

        let page_ids = self.paginator(kind).page(&filters).await?;
        let rows = if page_ids.ids.is_empty() {
            Vec::new()
        } else {
            let enriched = self.content.enrich_rows(kind, &page_ids.ids).await?;
            order_rows(&page_ids.ids, enriched)
        };

        Ok(ListingPage {
            rows,
            page: filters.page,
            pages: page_count(page_ids.total, filters.per_page),
            total: page_ids.total,
        })
    }

    /// 취소 신호를 받는 목록 조회
    ///
    /// 신호가 `true`가 되면 진행 중인 파티션 쿼리를 모두 버리고 `Cancelled`를 반환한다.
    pub async fn list_cancellable(
        &self,
        kind: ListingKind,
        filters: ListingFilters,
        page: i64,
        per_page: i64,
        cancel: watch::Receiver<bool>,
    ) -> Result<ListingPage, ListingError> {
        tokio::select! {
            biased;
            _ = cancelled(cancel) => {
                warn!("{:<12} --> {} 목록 조회 취소", "Listing", kind.as_str());
                Err(ListingError::Cancelled)
            }
            result = self.list(kind, filters, page, per_page) => result,
        }
    }
}

/// 취소 신호 대기. 송신 측이 사라지면 영원히 대기한다.
async fn cancelled(mut cancel: watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// 전체 페이지 수 (최소 1)
pub fn page_count(total: u64, per_page: u32) -> u64 {
    total.div_ceil(u64::from(per_page.max(1))).max(1)
}

/// 보강 결과를 id 순서대로 재배치. 누락된 id는 건너뛴다.
fn order_rows(ids: &[i64], rows: Vec<EnrichedRow>) -> Vec<EnrichedRow> {
    let mut by_id: HashMap<i64, EnrichedRow> = rows.into_iter().map(|row| (row.id, row)).collect();
    ids.iter()
        .filter_map(|id| {
            let row = by_id.remove(id);
            if row.is_none() {
                warn!("{:<12} --> 콘텐츠 누락 id: {}", "Listing", id);
            }
            row
        })
        .collect()
}

// endregion: --- Listing Service

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64) -> EnrichedRow {
        EnrichedRow {
            id,
            title: format!("Lot {}", id),
            permalink: format!("/lots/{}", id),
            image_url: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn page_count_is_at_least_one() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 3), 4);
        assert_eq!(page_count(9, 3), 3);
    }

    #[test]
    fn rows_follow_id_order_and_skip_missing() {
        let rows = order_rows(&[7, 3, 9], vec![row(9), row(7)]);
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7, 9]);
    }
}
