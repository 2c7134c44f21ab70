// region:    --- Imports
use crate::error::ListingError;
use crate::listing::{ListingFilters, ListingKind};
use crate::query::ListingService;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

// endregion: --- Imports

/// 페이지 크기 기본값
const DEFAULT_PER_PAGE: i64 = 10;

// region:    --- Listing Query

/// 목록 조회 쿼리 문자열
///
/// 숫자 값도 문자열로 받는다. 해석할 수 없는 값은 거부하지 않고 없는 것으로 본다.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub sort: Option<String>,
    pub owner_id: Option<String>,
    pub parent_id: Option<String>,
    pub country: Option<String>,
    pub subdivision: Option<String>,
    pub search: Option<String>,
    /// 쉼표로 구분된 id 목록
    pub ids: Option<String>,
}

impl ListingQuery {
    /// (필터, page, per_page) 로 분리. 숫자가 아닌 id 는 버린다.
    ///
    /// 빈 `ids` 는 지정 없음, 유효한 id 가 하나도 없는 `ids` 는 빈 지정 목록이다.
    pub fn into_parts(self) -> (ListingFilters, i64, i64) {
        let ids = self.ids.filter(|raw| !raw.trim().is_empty()).map(|raw| {
            raw.split(',')
                .filter_map(|part| part.trim().parse::<i64>().ok())
                .collect::<Vec<_>>()
        });
        let filters = ListingFilters {
            sort: self.sort,
            owner_id: lenient_int(self.owner_id),
            parent_id: lenient_int(self.parent_id),
            country: self.country,
            subdivision: self.subdivision,
            search: self.search,
            ids,
        };
        (
            filters,
            lenient_int(self.page).unwrap_or(1),
            lenient_int(self.per_page).unwrap_or(DEFAULT_PER_PAGE),
        )
    }
}

fn lenient_int(value: Option<String>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

// endregion: --- Listing Query

// region:    --- Query Handlers

/// 경매 목록 조회
pub async fn handle_list_auctions(
    State(service): State<Arc<ListingService>>,
    Query(query): Query<ListingQuery>,
) -> Response {
    list(service, ListingKind::Auctions, query).await
}

/// 경매 물품 목록 조회
pub async fn handle_list_items(
    State(service): State<Arc<ListingService>>,
    Query(query): Query<ListingQuery>,
) -> Response {
    list(service, ListingKind::Items, query).await
}

/// 상태 확인
pub async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn list(service: Arc<ListingService>, kind: ListingKind, query: ListingQuery) -> Response {
    info!("{:<12} --> {} 목록 조회 {:?}", "HandlerQuery", kind.as_str(), query);
    let (filters, page, per_page) = query.into_parts();

    match service.list(kind, filters, page, per_page).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => {
            error!("{:<12} --> 목록 조회 실패: {}", "HandlerQuery", e);
            let status = match e {
                ListingError::Content(_) => StatusCode::BAD_GATEWAY,
                ListingError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                ListingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
        }
    }
}

// endregion: --- Query Handlers
