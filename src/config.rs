// region:    --- Imports
use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

// endregion: --- Imports

// region:    --- Config

/// 캐시 저장소 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Postgres,
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" => Ok(Self::Postgres),
            _ => Err(ConfigError::Invalid {
                key: "LISTING_CACHE_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

/// 서비스 설정 (환경 변수 기반)
#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub kafka_brokers: String,
    pub sync_topic: String,
    pub sync_group: String,
    pub content_store_url: String,
    pub listen_addr: String,
    pub cache_backend: CacheBackend,
    /// 페이지 id 목록 캐시 TTL
    pub id_ttl: Duration,
    /// 파티션 카운트 캐시 TTL
    pub count_ttl: Duration,
    pub status_refresh_interval: Duration,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            database_max_connections: 5,
            kafka_brokers: "localhost:9092".to_string(),
            sync_topic: "listing-records".to_string(),
            sync_group: "listing-sync".to_string(),
            content_store_url: "http://localhost:8080".to_string(),
            listen_addr: "0.0.0.0:3000".to_string(),
            cache_backend: CacheBackend::Memory,
            id_ttl: Duration::from_secs(5 * 60),
            count_ttl: Duration::from_secs(15 * 60),
            status_refresh_interval: Duration::from_secs(60),
        }
    }
}

impl ListingConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            database_max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            kafka_brokers: string_var("KAFKA_BROKERS", defaults.kafka_brokers),
            sync_topic: string_var("LISTING_SYNC_TOPIC", defaults.sync_topic),
            sync_group: string_var("LISTING_SYNC_GROUP", defaults.sync_group),
            content_store_url: string_var("CONTENT_STORE_URL", defaults.content_store_url),
            listen_addr: string_var("LISTEN_ADDR", defaults.listen_addr),
            cache_backend: parse_var("LISTING_CACHE_BACKEND", defaults.cache_backend)?,
            id_ttl: Duration::from_secs(parse_var(
                "LISTING_ID_TTL_SECS",
                defaults.id_ttl.as_secs(),
            )?),
            count_ttl: Duration::from_secs(parse_var(
                "LISTING_COUNT_TTL_SECS",
                defaults.count_ttl.as_secs(),
            )?),
            status_refresh_interval: Duration::from_secs(parse_var(
                "STATUS_REFRESH_SECS",
                defaults.status_refresh_interval.as_secs(),
            )?),
        })
    }
}

fn string_var(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value })
        }
        _ => Ok(default),
    }
}

// endregion: --- Config

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_ttls() {
        let config = ListingConfig::default();
        assert_eq!(config.id_ttl, Duration::from_secs(300));
        assert_eq!(config.count_ttl, Duration::from_secs(900));
        assert_eq!(config.cache_backend, CacheBackend::Memory);
    }

    #[test]
    fn cache_backend_parses_case_insensitively() {
        assert_eq!("Postgres".parse::<CacheBackend>().unwrap(), CacheBackend::Postgres);
        assert!("redis".parse::<CacheBackend>().is_err());
    }
}
