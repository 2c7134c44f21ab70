// region:    --- Imports
use crate::listing::{FilterSet, ListingKind, ListingStatus};
use sqlx::{Postgres, QueryBuilder};

// endregion: --- Imports

// region:    --- Scope

/// 한 번의 count/fetch 쿼리가 다루는 행 집합
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// 상태 파티션 (ending_soon 정렬)
    Partition(ListingStatus),
    /// 전체 행, 생성 시각 역순 (newest 정렬)
    Newest,
    /// 지정 id 순서 고정
    Pinned,
}

impl Scope {
    /// 필터 셋이 요구하는 범위 목록 (우선순위 순)
    pub fn plan(filters: &FilterSet) -> Vec<Scope> {
        if filters.is_pinned() {
            vec![Scope::Pinned]
        } else if filters.sort == crate::listing::SortOrder::Newest {
            vec![Scope::Newest]
        } else {
            ListingStatus::PRIORITY
                .iter()
                .map(|status| Scope::Partition(*status))
                .collect()
        }
    }
}

/// 쿼리 결과 형태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Count,
    Ids { limit: u64, offset: u64 },
}

// endregion: --- Scope

// region:    --- Partition Query Template

/// 파티션 조건절. 상태 분류기와 같은 경계를 쓴다.
/// 각 조각 뒤에 현재 시각이 바인딩된다.
fn partition_predicate(status: ListingStatus) -> &'static [&'static str] {
    match status {
        ListingStatus::Running => &["starts_at <= ", " AND ends_at > "],
        ListingStatus::Upcoming => &["starts_at > "],
        ListingStatus::Expired => &["starts_at <= ", " AND ends_at <= "],
    }
}

/// 범위별 정렬절
pub fn order_by(kind: ListingKind, scope: Scope) -> &'static str {
    match (scope, kind.uses_lot_key()) {
        (Scope::Partition(ListingStatus::Running), true) => "ends_at ASC, lot_sort_key ASC, id ASC",
        (Scope::Partition(ListingStatus::Running), false) => "ends_at ASC, id ASC",
        (Scope::Partition(ListingStatus::Upcoming), true) => {
            "starts_at ASC, lot_sort_key ASC, id ASC"
        }
        (Scope::Partition(ListingStatus::Upcoming), false) => "starts_at ASC, id ASC",
        (Scope::Partition(ListingStatus::Expired), _) => "ends_at DESC, id ASC",
        (Scope::Newest, _) => "created_at DESC, id DESC",
        // 지정 순서는 array_position 으로 별도 처리
        (Scope::Pinned, _) => "",
    }
}

/// 모든 범위가 공유하는 단일 쿼리 템플릿
pub fn partition_query(
    kind: ListingKind,
    filters: &FilterSet,
    scope: Scope,
    now: i64,
    projection: Projection,
) -> QueryBuilder<'static, Postgres> {
    let select = match projection {
        Projection::Count => "SELECT COUNT(*) FROM ",
        Projection::Ids { .. } => "SELECT id FROM ",
    };
    let mut qb = QueryBuilder::new(select);
    qb.push(kind.table());
    qb.push(" WHERE TRUE");

    if scope == Scope::Pinned {
        let ids = filters.ids.clone().unwrap_or_default();
        qb.push(" AND id = ANY(");
        qb.push_bind(ids.clone());
        qb.push(")");
        if let Projection::Ids { limit, offset } = projection {
            qb.push(" ORDER BY array_position(");
            qb.push_bind(ids);
            qb.push(", id)");
            push_window(&mut qb, limit, offset);
        }
        return qb;
    }

    push_filters(&mut qb, filters);

    if let Scope::Partition(status) = scope {
        qb.push(" AND ");
        for sql in partition_predicate(status) {
            qb.push(*sql);
            qb.push_bind(now);
        }
    }

    if let Projection::Ids { limit, offset } = projection {
        qb.push(" ORDER BY ");
        qb.push(order_by(kind, scope));
        push_window(&mut qb, limit, offset);
    }
    qb
}

fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filters: &FilterSet) {
    if let Some(owner_id) = filters.owner_id {
        qb.push(" AND owner_id = ");
        qb.push_bind(owner_id);
    }
    if let Some(parent_id) = filters.parent_id {
        qb.push(" AND parent_id = ");
        qb.push_bind(parent_id);
    }
    if let Some(country) = &filters.country {
        qb.push(" AND location_country = ");
        qb.push_bind(country.clone());
    }
    if let Some(subdivision) = &filters.subdivision {
        qb.push(" AND location_subdivision = ");
        qb.push_bind(subdivision.clone());
    }
    if let Some(search) = &filters.search {
        qb.push(" AND search_text ILIKE ");
        qb.push_bind(format!("%{}%", escape_like(search)));
        qb.push(" ESCAPE '\\'");
    }
}

fn push_window(qb: &mut QueryBuilder<'static, Postgres>, limit: u64, offset: u64) {
    qb.push(" LIMIT ");
    qb.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    qb.push(" OFFSET ");
    qb.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));
}

/// LIKE 와일드카드 이스케이프
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// endregion: --- Partition Query Template

// region:    --- Maintenance / Write Queries

/// 저장된 상태 힌트 재계산 (시각 기준)
pub fn refresh_status(kind: ListingKind) -> String {
    format!(
        "UPDATE {table} SET status = CASE \
            WHEN starts_at > $1 THEN 20 \
            WHEN ends_at > $1 THEN 10 \
            ELSE 30 END \
         WHERE status IS DISTINCT FROM CASE \
            WHEN starts_at > $1 THEN 20 \
            WHEN ends_at > $1 THEN 10 \
            ELSE 30 END",
        table = kind.table()
    )
}

/// 목록 레코드 upsert
pub fn upsert_record(kind: ListingKind) -> String {
    format!(
        r#"
    INSERT INTO {table} (id, parent_id, owner_id, status, starts_at, ends_at, lot_sort_key,
        location_country, location_subdivision, location_city, search_text, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
    ON CONFLICT (id) DO UPDATE SET
        parent_id = EXCLUDED.parent_id,
        owner_id = EXCLUDED.owner_id,
        status = EXCLUDED.status,
        starts_at = EXCLUDED.starts_at,
        ends_at = EXCLUDED.ends_at,
        lot_sort_key = EXCLUDED.lot_sort_key,
        location_country = EXCLUDED.location_country,
        location_subdivision = EXCLUDED.location_subdivision,
        location_city = EXCLUDED.location_city,
        search_text = EXCLUDED.search_text,
        created_at = EXCLUDED.created_at
"#,
        table = kind.table()
    )
}

/// 목록 레코드 삭제
pub fn delete_record(kind: ListingKind) -> String {
    format!("DELETE FROM {} WHERE id = $1", kind.table())
}

/// 캐시 조회
pub const GET_CACHE_ENTRY: &str =
    "SELECT value FROM listing_cache WHERE key = $1 AND expires_at > $2";

/// 캐시 저장
pub const SET_CACHE_ENTRY: &str = r#"
    INSERT INTO listing_cache (key, value, expires_at)
    VALUES ($1, $2, $3)
    ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, expires_at = EXCLUDED.expires_at
"#;

/// 만료 캐시 삭제
pub const PURGE_CACHE_ENTRIES: &str = "DELETE FROM listing_cache WHERE expires_at <= $1";

// endregion: --- Maintenance / Write Queries

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{ListingFilters, SortOrder};

    fn filters(kind: ListingKind, raw: ListingFilters) -> FilterSet {
        FilterSet::normalize(kind, raw, 1, 10)
    }

    #[test]
    fn scope_plan_follows_mode() {
        let set = filters(ListingKind::Items, ListingFilters::default());
        assert_eq!(
            Scope::plan(&set),
            vec![
                Scope::Partition(ListingStatus::Running),
                Scope::Partition(ListingStatus::Upcoming),
                Scope::Partition(ListingStatus::Expired),
            ]
        );

        let mut newest = set.clone();
        newest.sort = SortOrder::Newest;
        assert_eq!(Scope::plan(&newest), vec![Scope::Newest]);

        let mut pinned = newest.clone();
        pinned.ids = Some(vec![7, 3, 9]);
        assert_eq!(Scope::plan(&pinned), vec![Scope::Pinned]);
    }

    #[test]
    fn running_items_query_orders_by_end_then_lot() {
        let set = filters(
            ListingKind::Items,
            ListingFilters {
                parent_id: Some(4),
                ..Default::default()
            },
        );
        let qb = partition_query(
            ListingKind::Items,
            &set,
            Scope::Partition(ListingStatus::Running),
            1_000,
            Projection::Ids {
                limit: 3,
                offset: 6,
            },
        );
        assert_eq!(
            qb.sql(),
            "SELECT id FROM item_listings WHERE TRUE AND parent_id = $1 \
             AND starts_at <= $2 AND ends_at > $3 \
             ORDER BY ends_at ASC, lot_sort_key ASC, id ASC LIMIT $4 OFFSET $5"
        );
    }

    #[test]
    fn expired_auction_count_has_no_order_or_window() {
        let set = filters(
            ListingKind::Auctions,
            ListingFilters {
                owner_id: Some(2),
                country: Some("fr".to_string()),
                ..Default::default()
            },
        );
        let qb = partition_query(
            ListingKind::Auctions,
            &set,
            Scope::Partition(ListingStatus::Expired),
            1_000,
            Projection::Count,
        );
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM auction_listings WHERE TRUE AND owner_id = $1 \
             AND location_country = $2 AND starts_at <= $3 AND ends_at <= $4"
        );
    }

    #[test]
    fn pinned_query_skips_filters_and_keeps_caller_order() {
        let set = filters(
            ListingKind::Items,
            ListingFilters {
                owner_id: Some(2),
                ids: Some(vec![7, 3, 9]),
                ..Default::default()
            },
        );
        let qb = partition_query(
            ListingKind::Items,
            &set,
            Scope::Pinned,
            1_000,
            Projection::Ids {
                limit: 10,
                offset: 0,
            },
        );
        assert_eq!(
            qb.sql(),
            "SELECT id FROM item_listings WHERE TRUE AND id = ANY($1) \
             ORDER BY array_position($2, id) LIMIT $3 OFFSET $4"
        );
    }

    #[test]
    fn expired_order_ignores_lot_key() {
        assert_eq!(
            order_by(ListingKind::Items, Scope::Partition(ListingStatus::Expired)),
            "ends_at DESC, id ASC"
        );
        assert_eq!(
            order_by(ListingKind::Auctions, Scope::Partition(ListingStatus::Upcoming)),
            "starts_at ASC, id ASC"
        );
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
