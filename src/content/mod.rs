// region:    --- Imports
use crate::error::ContentError;
use crate::listing::{EnrichedRow, ListingKind};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error};

// endregion: --- Imports

// region:    --- Content Store Trait

/// 제목/이미지/링크를 소유한 콘텐츠 저장소
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// 주어진 id 목록의 표시용 메타데이터
    async fn enrich_rows(
        &self,
        kind: ListingKind,
        ids: &[i64],
    ) -> Result<Vec<EnrichedRow>, ContentError>;
}

// endregion: --- Content Store Trait

// region:    --- HTTP Content Store

#[derive(Serialize)]
struct EnrichRequest<'a> {
    ids: &'a [i64],
}

/// HTTP 콘텐츠 저장소 클라이언트 (`POST {base}/{kind}/enrich`)
pub struct HttpContentStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn enrich_rows(
        &self,
        kind: ListingKind,
        ids: &[i64],
    ) -> Result<Vec<EnrichedRow>, ContentError> {
        let url = format!("{}/{}/enrich", self.base_url, kind.as_str());
        debug!("{:<12} --> 콘텐츠 조회 {} ids={}", "Content", url, ids.len());

        let response = self
            .client
            .post(&url)
            .json(&EnrichRequest { ids })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("{:<12} --> 콘텐츠 저장소 오류 응답: {}", "Content", status);
            return Err(ContentError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<Vec<EnrichedRow>>().await?)
    }
}

// endregion: --- HTTP Content Store
