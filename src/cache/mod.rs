//! 조회 결과 캐시
//!
//! 필터 셋 해시를 키로 페이지 id 목록과 파티션 카운트를 각각의 TTL로 보관한다.
//! 쓰기 시점 무효화는 없고 TTL 만료만으로 갱신된다.
// region:    --- Imports
use crate::error::CacheError;
use crate::listing::{FilterSet, ListingKind};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

// endregion: --- Imports

// region:    --- Modules
mod memory;
mod postgres;

pub use memory::MemoryCacheStore;
pub use postgres::PgCacheStore;
// endregion: --- Modules

// region:    --- Cache Store Trait

/// 키 → (값, 만료 시각) 저장소
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError>;

    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration)
        -> Result<(), CacheError>;

    /// 만료된 항목 정리. 정리한 항목 수 반환.
    async fn purge_expired(&self) -> Result<u64, CacheError>;
}

// endregion: --- Cache Store Trait

// region:    --- Cache Keys

/// 캐시 항목 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSlot {
    /// 페이지 id 목록
    Ids,
    /// 파티션 카운트
    Counts,
}

impl CacheSlot {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Ids => "ids",
            Self::Counts => "counts",
        }
    }
}

/// 정규화된 필터 셋의 결정적 해시 키
///
/// 카운트 키는 페이지 정보를 제외하므로 같은 필터의 모든 페이지가 공유한다.
pub fn cache_key(kind: ListingKind, slot: CacheSlot, filters: &FilterSet) -> String {
    let basis = match slot {
        CacheSlot::Ids => filters.clone(),
        CacheSlot::Counts => filters.without_paging(),
    };
    let json = serde_json::to_vec(&basis).unwrap_or_default();
    let digest = Sha256::digest(&json);

    let mut key = format!("listing:{}:{}:", kind.as_str(), slot.as_str());
    for byte in digest.iter() {
        let _ = write!(key, "{:02x}", byte);
    }
    key
}

// endregion: --- Cache Keys

// region:    --- Result Cache

/// 읽기 관통(read-through) 캐시
///
/// 저장소 실패는 캐시 미스로 취급한다. 동일 요청의 중복 계산(single-flight)은 막지 않는다.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// 캐시에 있으면 반환, 없으면 계산 후 저장
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.store.get(key).await {
            Ok(Some(value)) => match serde_json::from_value::<T>(value) {
                Ok(hit) => {
                    debug!("{:<12} --> 캐시 적중: {}", "Cache", key);
                    return Ok(hit);
                }
                Err(e) => warn!("{:<12} --> 캐시 값 해석 실패, 미스 처리: {:?}", "Cache", e),
            },
            Ok(None) => debug!("{:<12} --> 캐시 미스: {}", "Cache", key),
            Err(e) => warn!("{:<12} --> 캐시 조회 실패, 미스 처리: {:?}", "Cache", e),
        }

        let value = compute().await?;

        match serde_json::to_value(&value) {
            Ok(json) => {
                if let Err(e) = self.store.set(key, json, ttl).await {
                    warn!("{:<12} --> 캐시 저장 실패: {:?}", "Cache", e);
                }
            }
            Err(e) => warn!("{:<12} --> 캐시 값 직렬화 실패: {:?}", "Cache", e),
        }

        Ok(value)
    }
}

// endregion: --- Result Cache
