// region:    --- Imports
use auction_listing::cache::{CacheStore, MemoryCacheStore, PgCacheStore, ResultCache};
use auction_listing::clock::{Clock, SystemClock};
use auction_listing::config::{CacheBackend, ListingConfig};
use auction_listing::content::HttpContentStore;
use auction_listing::database::DatabaseManager;
use auction_listing::handlers;
use auction_listing::listing::ListingKind;
use auction_listing::message_broker::KafkaManager;
use auction_listing::query::{ListingService, Paginator, PgPartitionRepository};
use auction_listing::scheduler::ListingScheduler;
use auction_listing::store::PgListingWriter;
use auction_listing::sync::SyncConsumer;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일이 있으면 로드
    let _ = dotenvy::dotenv();

    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = ListingConfig::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // DatabaseManager 생성 및 스키마 초기화
    let db_manager = Arc::new(DatabaseManager::new(&config).await?);
    if let Err(e) = db_manager.initialize_schema().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 캐시 저장소 선택
    let cache_store: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new(Arc::clone(&clock))),
        CacheBackend::Postgres => Arc::new(PgCacheStore::new(
            db_manager.get_pool(),
            Arc::clone(&clock),
        )),
    };
    let cache = ResultCache::new(Arc::clone(&cache_store));

    // 엔티티 종류별 페이지 계산기
    let paginator = |kind: ListingKind| {
        Paginator::new(
            kind,
            Arc::new(PgPartitionRepository::new(
                db_manager.get_pool(),
                kind,
                Arc::clone(&clock),
            )),
            cache.clone(),
            config.id_ttl,
            config.count_ttl,
        )
    };
    let service = Arc::new(ListingService::new(
        paginator(ListingKind::Auctions),
        paginator(ListingKind::Items),
        Arc::new(HttpContentStore::new(config.content_store_url.clone())),
    ));

    // Kafka 동기화 컨슈머
    let kafka_manager = KafkaManager::new(&config.kafka_brokers, &config.sync_group)?;
    kafka_manager.create_topic(&config.sync_topic, 5, 1).await?;
    let sync_consumer = SyncConsumer::new(
        Arc::new(PgListingWriter::new(Arc::clone(&db_manager))),
        kafka_manager.get_consumer(),
        Arc::clone(&clock),
        config.sync_topic.clone(),
    );
    tokio::spawn(async move {
        sync_consumer.start().await;
    });
    info!("{:<12} --> 동기화 컨슈머 시작: {}", "Main", config.sync_topic);

    // 상태 힌트 갱신 / 캐시 정리 스케줄러
    let scheduler = ListingScheduler::new(
        db_manager.get_pool(),
        cache_store,
        Arc::clone(&clock),
        config.status_refresh_interval,
    );
    scheduler.start().await;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = Router::new()
        .route("/auctions", get(handlers::handle_list_auctions))
        .route("/items", get(handlers::handle_list_items))
        .route("/health", get(handlers::handle_health))
        .layer(cors)
        .with_state(service);

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
