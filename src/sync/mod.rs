//! 목록 레코드 동기화 컨슈머
//!
//! 원본 엔티티의 변경 이벤트를 받아 랏 정렬 키와 상태 힌트를 계산한 뒤 목록 테이블에 반영한다.
//! 조회 캐시는 건드리지 않으므로 변경은 캐시 TTL 이후에 목록에 보인다.
// region:    --- Imports
use crate::clock::Clock;
use crate::error::WriteError;
use crate::listing::{ListingKind, ListingRecord, ListingSource};
use crate::message_broker::KafkaConsumer;
use crate::store::ListingWriter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Listing Event

/// 동기화 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ListingEvent {
    /// 생성 또는 변경
    Upserted {
        kind: ListingKind,
        source: ListingSource,
    },
    /// 삭제 또는 비공개 전환
    Deleted { kind: ListingKind, id: i64 },
}

// endregion: --- Listing Event

// region:    --- Sync Consumer

pub struct SyncConsumer {
    writer: Arc<dyn ListingWriter>,
    kafka_consumer: Arc<KafkaConsumer>,
    clock: Arc<dyn Clock>,
    topic: String,
}

impl SyncConsumer {
    pub fn new(
        writer: Arc<dyn ListingWriter>,
        kafka_consumer: Arc<KafkaConsumer>,
        clock: Arc<dyn Clock>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            writer,
            kafka_consumer,
            clock,
            topic: topic.into(),
        }
    }

    /// 동기화 시작
    pub async fn start(&self) {
        let writer = Arc::clone(&self.writer);
        let clock = Arc::clone(&self.clock);
        if let Err(e) = self
            .kafka_consumer
            .consume_events(&self.topic, move |event: ListingEvent| {
                let writer = Arc::clone(&writer);
                let clock = Arc::clone(&clock);
                Box::pin(async move { apply_event(writer.as_ref(), clock.as_ref(), event).await })
            })
            .await
        {
            error!("{:<12} --> 동기화 이벤트 소비 오류: {:?}", "Sync", e);
        }
    }
}

/// 이벤트 하나를 목록 테이블에 반영
pub async fn apply_event(
    writer: &dyn ListingWriter,
    clock: &dyn Clock,
    event: ListingEvent,
) -> Result<(), WriteError> {
    match event {
        ListingEvent::Upserted { kind, source } => {
            let record = ListingRecord::from_source(kind, source, clock.unix_now());
            info!(
                "{:<12} --> {} 반영 id: {} status: {:?} lot_key: {}",
                "Sync",
                kind.as_str(),
                record.id,
                record.status,
                record.lot_sort_key
            );
            writer.write_listing_record(kind, &record).await
        }
        ListingEvent::Deleted { kind, id } => {
            let removed = writer.delete_listing_record(kind, id).await?;
            info!(
                "{:<12} --> {} 삭제 id: {} (removed: {})",
                "Sync",
                kind.as_str(),
                id,
                removed
            );
            Ok(())
        }
    }
}

// endregion: --- Sync Consumer

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::listing::ListingStatus;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingWriter {
        written: Mutex<Vec<(ListingKind, ListingRecord)>>,
        deleted: Mutex<Vec<(ListingKind, i64)>>,
    }

    #[async_trait]
    impl ListingWriter for RecordingWriter {
        async fn write_listing_record(
            &self,
            kind: ListingKind,
            record: &ListingRecord,
        ) -> Result<(), WriteError> {
            crate::store::validate_record(kind, record)?;
            self.written.lock().unwrap().push((kind, record.clone()));
            Ok(())
        }

        async fn delete_listing_record(
            &self,
            kind: ListingKind,
            id: i64,
        ) -> Result<bool, WriteError> {
            self.deleted.lock().unwrap().push((kind, id));
            Ok(true)
        }
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let json = r#"{"type":"upserted","kind":"items","source":{"id":4,"parent_id":1,"starts_at":10,"ends_at":20,"lot_number":"3B"}}"#;
        let event: ListingEvent = serde_json::from_str(json).unwrap();
        match event {
            ListingEvent::Upserted { kind, source } => {
                assert_eq!(kind, ListingKind::Items);
                assert_eq!(source.lot_number.as_deref(), Some("3B"));
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let event: ListingEvent =
            serde_json::from_str(r#"{"type":"deleted","kind":"auctions","id":9}"#).unwrap();
        assert_eq!(
            event,
            ListingEvent::Deleted {
                kind: ListingKind::Auctions,
                id: 9
            }
        );
    }

    #[tokio::test]
    async fn upsert_encodes_lot_and_classifies_status() {
        let writer = RecordingWriter::default();
        let clock = ManualClock::at_unix(5);
        let event = ListingEvent::Upserted {
            kind: ListingKind::Items,
            source: ListingSource {
                id: 4,
                parent_id: 1,
                starts_at: 10,
                ends_at: 20,
                lot_number: Some("LOT-3B".to_string()),
                ..Default::default()
            },
        };

        apply_event(&writer, &clock, event).await.unwrap();

        let written = writer.written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].1.lot_sort_key, 30_002);
        assert_eq!(written[0].1.status, ListingStatus::Upcoming);
    }

    #[tokio::test]
    async fn orphan_items_are_rejected() {
        let writer = RecordingWriter::default();
        let clock = ManualClock::at_unix(5);
        let event = ListingEvent::Upserted {
            kind: ListingKind::Items,
            source: ListingSource {
                id: 4,
                starts_at: 10,
                ends_at: 20,
                ..Default::default()
            },
        };

        assert!(apply_event(&writer, &clock, event).await.is_err());
        assert!(writer.written.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_is_forwarded() {
        let writer = RecordingWriter::default();
        let clock = ManualClock::at_unix(5);
        apply_event(
            &writer,
            &clock,
            ListingEvent::Deleted {
                kind: ListingKind::Auctions,
                id: 3,
            },
        )
        .await
        .unwrap();
        assert_eq!(
            *writer.deleted.lock().unwrap(),
            vec![(ListingKind::Auctions, 3)]
        );
    }
}
