//! 목록 유지보수 스케줄러
//! 저장된 status 값은 인덱스용 힌트일 뿐이므로 주기적으로 시각 기준으로 다시 맞춘다.
//! 조회 엔진은 이 값을 신뢰하지 않고 매 쿼리마다 시각으로 파티션을 판정한다.
// region:    --- Imports
use crate::cache::CacheStore;
use crate::clock::Clock;
use crate::listing::ListingKind;
use crate::query::queries;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error};

// endregion: --- Imports

// region:    --- Listing Scheduler
/// 상태 힌트 갱신 + 만료 캐시 정리
pub struct ListingScheduler {
    pool: Arc<PgPool>,
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    period: Duration,
}

impl ListingScheduler {
    pub fn new(
        pool: Arc<PgPool>,
        cache: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) -> Self {
        Self {
            pool,
            cache,
            clock,
            period,
        }
    }

    /// 스케줄러 시작
    pub async fn start(&self) {
        let pool = Arc::clone(&self.pool);
        let cache = Arc::clone(&self.cache);
        let clock = Arc::clone(&self.clock);
        let period = self.period;
        tokio::spawn(async move {
            let mut interval = interval(period);
            loop {
                interval.tick().await;
                if let Err(e) = Self::refresh_statuses(&pool, clock.as_ref()).await {
                    error!(
                        "{:<12} --> 상태 힌트 갱신 중 오류 발생: {:?}",
                        "Scheduler", e
                    );
                }
                match cache.purge_expired().await {
                    Ok(purged) if purged > 0 => {
                        debug!("{:<12} --> 만료 캐시 {}건 정리", "Scheduler", purged)
                    }
                    Ok(_) => {}
                    Err(e) => error!("{:<12} --> 캐시 정리 중 오류 발생: {:?}", "Scheduler", e),
                }
            }
        });
    }

    /// 시각 기준으로 저장된 상태 힌트 갱신
    async fn refresh_statuses(pool: &PgPool, clock: &dyn Clock) -> Result<(), sqlx::Error> {
        let now = clock.unix_now();

        for kind in [ListingKind::Auctions, ListingKind::Items] {
            let result = sqlx::query(&queries::refresh_status(kind))
                .bind(now)
                .execute(pool)
                .await?;
            debug!(
                "{:<12} --> {} 상태 힌트 {}건 갱신",
                "Scheduler",
                kind.as_str(),
                result.rows_affected()
            );
        }

        Ok(())
    }
}
// endregion: --- Listing Scheduler
