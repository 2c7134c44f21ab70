// region:    --- Imports
use thiserror::Error;

// endregion: --- Imports

// region:    --- Errors

/// 파티션 조회(count/fetch) 실패
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("listing query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("listing store unavailable: {0}")]
    Unavailable(String),
}

/// 캐시 저장소 실패. ResultCache 밖으로 전파되지 않는다.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache store failed: {0}")]
    Store(String),

    #[error("cache value could not be (de)serialized: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("cache query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// 콘텐츠 저장소(enrichment) 실패
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("content store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("content store returned status {status}")]
    Status { status: u16 },

    #[error("{0}")]
    Other(String),
}

/// 목록 레코드 쓰기 실패
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("invalid listing record {id}: {reason}")]
    Invalid { id: i64, reason: &'static str },

    #[error("listing write failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// 설정 오류
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// 목록 조회 파사드 오류
#[derive(Error, Debug)]
pub enum ListingError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("listing request cancelled")]
    Cancelled,
}

// endregion: --- Errors
