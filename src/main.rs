use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use nilmatch::config::Settings;
use nilmatch::core::{MatcherConfig, MatchingService};
use nilmatch::embedding::EmbeddingEngine;
use nilmatch::routes;
use nilmatch::routes::matching::AppState;
use nilmatch::services::{
    spawn_periodic, CampaignProcessor, Notifier, PocketBaseClient, RetryPolicy, StoreCollections,
    TaskQueue, TrendingService,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error as log_error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(settings.logging.level.clone()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting NILMatch matching service...");

    // Initialize PocketBase client
    let collections = StoreCollections {
        athletes: settings.collection.athletes.clone(),
        brands: settings.collection.brands.clone(),
        athlete_metrics: settings.collection.athlete_metrics.clone(),
        campaigns: settings.collection.campaigns.clone(),
        matches: settings.collection.matches.clone(),
        notifications: settings.collection.notifications.clone(),
        trending: settings.collection.trending.clone(),
    };

    let store = Arc::new(PocketBaseClient::new(
        settings.pocketbase.endpoint.clone(),
        settings.pocketbase.admin_token.clone(),
        collections,
    ));

    info!(
        "PocketBase client initialized ({})",
        settings.pocketbase.endpoint
    );

    // Construct the embedding engine once; it is shared read-only after load.
    // Loading runs in the background so startup stays fast; scoring requests
    // fail with a model-not-ready error until it completes.
    let embedder = Arc::new(EmbeddingEngine::new(settings.embedding.clone()));
    let warm = embedder.clone();
    tokio::task::spawn_blocking(move || {
        if let Err(e) = warm.load() {
            log_error!("Embedding model load failed, scoring is unavailable: {}", e);
        }
    });

    // Initialize the matching service with configured weights
    let matcher_config = MatcherConfig {
        weights: settings.scoring.weights.clone().into(),
        score_threshold: settings.matching.score_threshold,
        rate_per_follower: settings.scoring.rate_per_follower,
        success_rate_offset: settings.scoring.success_rate_offset,
    };
    let matcher = Arc::new(MatchingService::new(embedder, matcher_config));

    info!(
        "Matcher initialized (threshold: {}, rate/follower: {})",
        settings.matching.score_threshold, settings.scoring.rate_per_follower
    );

    // Campaign processing and trending services
    let campaigns = Arc::new(CampaignProcessor::new(
        store.clone(),
        matcher.clone(),
        Notifier::new(store.clone()),
        settings.matching.campaign_store_limit,
        settings.matching.candidate_page_size,
    ));
    let trending = Arc::new(TrendingService::new(
        store.clone(),
        settings.matching.trending_window_days,
    ));

    // Background task queue with retry policy
    let tasks = Arc::new(TaskQueue::start());
    let retry = RetryPolicy {
        max_retries: settings.worker.max_retries,
        backoff: Duration::from_secs(settings.worker.backoff_secs),
    };

    // Periodic jobs: campaign sweep and trending refresh
    let sweep = campaigns.clone();
    spawn_periodic(
        "process-active-campaigns",
        Duration::from_secs(settings.worker.campaign_interval_secs),
        move || {
            let sweep = sweep.clone();
            async move {
                sweep
                    .process_active_campaigns()
                    .await
                    .map(|_| ())
                    .map_err(Into::into)
            }
        },
    );

    let refresher = trending.clone();
    let trending_limit = settings.matching.max_limit as usize;
    spawn_periodic(
        "update-trending-athletes",
        Duration::from_secs(settings.worker.trending_interval_secs),
        move || {
            let refresher = refresher.clone();
            async move {
                refresher
                    .refresh(trending_limit)
                    .await
                    .map(|_| ())
                    .map_err(Into::into)
            }
        },
    );

    // Build application state
    let app_state = AppState {
        store,
        matcher,
        campaigns,
        trending,
        tasks,
        retry,
        max_limit: settings.matching.max_limit,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
