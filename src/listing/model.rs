// region:    --- Imports
use super::{lot, status};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// endregion: --- Imports

/// 페이지당 최대 행 수
pub const MAX_PER_PAGE: u32 = 50;

// region:    --- Listing Kind / Status

/// 목록 엔티티 종류 (경매 / 경매 물품)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Auctions,
    Items,
}

impl ListingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auctions => "auctions",
            Self::Items => "items",
        }
    }

    /// 목록 레코드 테이블
    pub fn table(&self) -> &'static str {
        match self {
            Self::Auctions => "auction_listings",
            Self::Items => "item_listings",
        }
    }

    /// 랏 정렬 키를 2차 정렬 기준으로 쓰는지 여부
    pub fn uses_lot_key(&self) -> bool {
        matches!(self, Self::Items)
    }
}

/// 경매 상태 파티션. 저장된 값은 힌트일 뿐이고 판정 기준은 시각이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Running,
    Upcoming,
    Expired,
}

impl ListingStatus {
    /// 우선순위 순서 (진행 중 → 예정 → 종료)
    pub const PRIORITY: [ListingStatus; 3] = [Self::Running, Self::Upcoming, Self::Expired];

    pub fn code(&self) -> i16 {
        match self {
            Self::Running => 10,
            Self::Upcoming => 20,
            Self::Expired => 30,
        }
    }
}

// endregion: --- Listing Kind / Status

// region:    --- Listing Record

/// 동기화 측에서 전달되는 원본 엔티티 (랏 번호 원문 포함)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingSource {
    pub id: i64,
    #[serde(default)]
    pub parent_id: i64,
    #[serde(default)]
    pub owner_id: i64,
    pub starts_at: i64,
    pub ends_at: i64,
    #[serde(default)]
    pub lot_number: Option<String>,
    #[serde(default)]
    pub location_country: String,
    #[serde(default)]
    pub location_subdivision: String,
    #[serde(default)]
    pub location_city: String,
    #[serde(default)]
    pub search_text: String,
    #[serde(default)]
    pub created_at: i64,
}

/// 조회 엔진용 비정규화 레코드 (경매/물품 공통 형태)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: i64,
    pub parent_id: i64,
    pub owner_id: i64,
    pub status: ListingStatus,
    pub starts_at: i64,
    pub ends_at: i64,
    pub lot_sort_key: u64,
    pub location_country: String,
    pub location_subdivision: String,
    pub location_city: String,
    pub search_text: String,
    pub created_at: i64,
}

impl ListingRecord {
    /// 원본 엔티티로부터 레코드 생성. 랏 정렬 키와 상태 힌트를 계산한다.
    pub fn from_source(kind: ListingKind, source: ListingSource, now: i64) -> Self {
        let lot_sort_key = match (kind, source.lot_number.as_deref()) {
            (ListingKind::Items, Some(text)) if !text.trim().is_empty() => {
                lot::encode(text, source.id)
            }
            _ => 0,
        };

        Self {
            id: source.id,
            parent_id: match kind {
                ListingKind::Auctions => 0,
                ListingKind::Items => source.parent_id,
            },
            owner_id: source.owner_id,
            status: status::classify(source.starts_at, source.ends_at, now),
            starts_at: source.starts_at,
            ends_at: source.ends_at,
            lot_sort_key,
            location_country: source.location_country.trim().to_ascii_uppercase(),
            location_subdivision: source.location_subdivision.trim().to_string(),
            location_city: source.location_city.trim().to_string(),
            search_text: source.search_text,
            created_at: source.created_at,
        }
    }
}

// endregion: --- Listing Record

// region:    --- Filters

/// 정렬 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    EndingSoon,
    Newest,
}

impl SortOrder {
    /// 알 수 없는 값은 `ending_soon`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" => Self::Newest,
            _ => Self::EndingSoon,
        }
    }
}

/// 호출 측에서 전달한 정규화 전 필터
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilters {
    pub sort: Option<String>,
    pub owner_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub country: Option<String>,
    pub subdivision: Option<String>,
    pub search: Option<String>,
    pub ids: Option<Vec<i64>>,
}

/// 정규화된 불변 필터 셋. 캐시 키의 기준이 된다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilterSet {
    pub page: u32,
    pub per_page: u32,
    pub sort: SortOrder,
    pub owner_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub country: Option<String>,
    pub subdivision: Option<String>,
    pub search: Option<String>,
    /// 지정 id 목록. 있으면 다른 필터와 정렬을 모두 무시한다. 비어 있으면 결과도 비어 있다.
    pub ids: Option<Vec<i64>>,
}

impl FilterSet {
    /// 입력값 정규화. 잘못된 값은 거부하지 않고 보정한다.
    pub fn normalize(kind: ListingKind, filters: ListingFilters, page: i64, per_page: i64) -> Self {
        let ids = filters.ids.map(|ids| {
            let mut seen = HashSet::new();
            ids.into_iter()
                .filter(|id| *id > 0 && seen.insert(*id))
                .collect::<Vec<_>>()
        });

        Self {
            page: page.clamp(1, i64::from(u32::MAX)) as u32,
            per_page: per_page.clamp(1, i64::from(MAX_PER_PAGE)) as u32,
            sort: filters
                .sort
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
            owner_id: filters.owner_id.filter(|id| *id > 0),
            parent_id: match kind {
                ListingKind::Items => filters.parent_id.filter(|id| *id > 0),
                ListingKind::Auctions => None,
            },
            country: non_empty(filters.country).map(|c| c.to_ascii_uppercase()),
            subdivision: non_empty(filters.subdivision),
            search: non_empty(filters.search),
            ids,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.ids.is_some()
    }

    /// 전역 오프셋
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// 페이지 정보를 제외한 필터 (카운트 캐시 키용)
    pub fn without_paging(&self) -> Self {
        Self {
            page: 1,
            per_page: 1,
            ..self.clone()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// endregion: --- Filters

// region:    --- Listing Page

/// 콘텐츠 저장소가 채워준 표시용 행
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub id: i64,
    pub title: String,
    pub permalink: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// 목록 조회 결과 한 페이지
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPage {
    pub rows: Vec<EnrichedRow>,
    pub page: u32,
    pub pages: u64,
    pub total: u64,
}

// endregion: --- Listing Page

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_paging_and_defaults_sort() {
        let filters = ListingFilters {
            sort: Some("most_bids".to_string()),
            ..Default::default()
        };
        let set = FilterSet::normalize(ListingKind::Auctions, filters, 0, 500);
        assert_eq!(set.page, 1);
        assert_eq!(set.per_page, MAX_PER_PAGE);
        assert_eq!(set.sort, SortOrder::EndingSoon);

        let set = FilterSet::normalize(ListingKind::Auctions, ListingFilters::default(), 3, -2);
        assert_eq!(set.page, 3);
        assert_eq!(set.per_page, 1);
    }

    #[test]
    fn normalize_cleans_text_and_ids() {
        let filters = ListingFilters {
            sort: Some(" Newest ".to_string()),
            owner_id: Some(0),
            parent_id: Some(9),
            country: Some(" de ".to_string()),
            subdivision: Some("   ".to_string()),
            search: Some(" clock ".to_string()),
            ids: Some(vec![7, 3, 7, -1, 9]),
        };
        let set = FilterSet::normalize(ListingKind::Items, filters.clone(), 1, 10);
        assert_eq!(set.sort, SortOrder::Newest);
        assert_eq!(set.owner_id, None);
        assert_eq!(set.parent_id, Some(9));
        assert_eq!(set.country.as_deref(), Some("DE"));
        assert_eq!(set.subdivision, None);
        assert_eq!(set.search.as_deref(), Some("clock"));
        assert_eq!(set.ids, Some(vec![7, 3, 9]));

        // 경매 목록에는 상위 id 필터가 없다
        let set = FilterSet::normalize(ListingKind::Auctions, filters, 1, 10);
        assert_eq!(set.parent_id, None);
    }

    #[test]
    fn pin_list_without_valid_ids_stays_pinned() {
        let filters = ListingFilters {
            ids: Some(vec![0, -4]),
            ..Default::default()
        };
        let set = FilterSet::normalize(ListingKind::Items, filters, 1, 10);
        assert!(set.is_pinned());
        assert_eq!(set.ids, Some(vec![]));

        let set = FilterSet::normalize(ListingKind::Items, ListingFilters::default(), 1, 10);
        assert!(!set.is_pinned());
    }

    #[test]
    fn record_from_source_encodes_lot_and_status() {
        let source = ListingSource {
            id: 12,
            parent_id: 3,
            starts_at: 100,
            ends_at: 200,
            lot_number: Some("Lot 10A".to_string()),
            location_country: "at".to_string(),
            ..Default::default()
        };
        let record = ListingRecord::from_source(ListingKind::Items, source.clone(), 150);
        assert_eq!(record.lot_sort_key, 100_001);
        assert_eq!(record.status, ListingStatus::Running);
        assert_eq!(record.location_country, "AT");

        let record = ListingRecord::from_source(ListingKind::Auctions, source, 250);
        assert_eq!(record.parent_id, 0);
        assert_eq!(record.lot_sort_key, 0);
        assert_eq!(record.status, ListingStatus::Expired);
    }
}
