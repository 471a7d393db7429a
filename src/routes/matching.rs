use crate::core::MatchingService;
use crate::embedding::EmbeddingError;
use crate::models::{
    AthleteMatchRequest, AthleteProfile, BrandMatchRequest, CompatibilityRequest, ErrorResponse,
    HealthResponse, MatchListResponse, PlatformMetrics, ProcessCampaignRequest,
    ProcessCampaignResponse, TrendingResponse,
};
use crate::services::{
    CampaignProcessor, ListQuery, PocketBaseClient, RetryPolicy, StoreError, TaskQueue,
    TrendingService,
};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PocketBaseClient>,
    pub matcher: Arc<MatchingService>,
    pub campaigns: Arc<CampaignProcessor>,
    pub trending: Arc<TrendingService>,
    pub tasks: Arc<TaskQueue>,
    pub retry: RetryPolicy,
    pub max_limit: u16,
}

/// Configure all matching-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route(
            "/matching/compatibility",
            web::post().to(calculate_compatibility),
        )
        .route(
            "/matching/athletes-for-brand",
            web::post().to(athletes_for_brand),
        )
        .route(
            "/matching/brands-for-athlete",
            web::post().to(brands_for_athlete),
        )
        .route("/campaigns/process", web::post().to(process_campaign))
        .route("/athletes/trending", web::get().to(trending_athletes));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn store_error_response(context: &str, e: StoreError) -> HttpResponse {
    tracing::error!("{}: {}", context, e);
    let (builder, status_code) = match &e {
        StoreError::NotFound(_) => (HttpResponse::NotFound(), 404),
        StoreError::Unavailable(_) => (HttpResponse::ServiceUnavailable(), 503),
        _ => (HttpResponse::InternalServerError(), 500),
    };
    let mut builder = builder;
    builder.json(ErrorResponse {
        error: context.to_string(),
        message: e.to_string(),
        status_code,
    })
}

fn scoring_error_response(e: EmbeddingError) -> HttpResponse {
    tracing::error!("Scoring failed: {}", e);
    match &e {
        EmbeddingError::ModelNotReady(_) => HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "Embedding model not ready".to_string(),
            message: e.to_string(),
            status_code: 503,
        }),
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "Scoring failed".to_string(),
            message: e.to_string(),
            status_code: 500,
        }),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_reachable = state.store.health_check().await;
    let model_ready = state.matcher.is_ready();

    let status = if store_reachable && model_ready {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_ready,
        store_reachable,
        timestamp: chrono::Utc::now(),
    })
}

/// Detailed compatibility analysis for one athlete/brand pair
///
/// POST /api/v1/matching/compatibility
async fn calculate_compatibility(
    state: web::Data<AppState>,
    req: web::Json<CompatibilityRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let athlete = match state.store.get_athlete(&req.athlete_id).await {
        Ok(athlete) => athlete,
        Err(e) => return store_error_response("Failed to fetch athlete", e),
    };
    let brand = match state.store.get_brand(&req.brand_id).await {
        Ok(brand) => brand,
        Err(e) => return store_error_response("Failed to fetch brand", e),
    };
    let metrics = match state.store.athlete_metrics(&req.athlete_id).await {
        Ok(metrics) => metrics,
        Err(e) => return store_error_response("Failed to fetch athlete metrics", e),
    };

    match state.matcher.calculate_compatibility(&athlete, &brand, &metrics) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => scoring_error_response(e),
    }
}

/// Rank athletes for a brand
///
/// POST /api/v1/matching/athletes-for-brand
async fn athletes_for_brand(
    state: web::Data<AppState>,
    req: web::Json<AthleteMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let limit = req.limit.min(state.max_limit) as usize;

    let brand = match state.store.get_brand(&req.brand_id).await {
        Ok(brand) => brand,
        Err(e) => return store_error_response("Failed to fetch brand", e),
    };

    let mut filter = "status = 'active' && nil_eligible = true".to_string();
    if let Some(sport) = &req.sport_filter {
        filter.push_str(&format!(" && sport = '{}'", sport));
    }

    let athletes = match state
        .store
        .list_athletes(&ListQuery::filtered(filter))
        .await
    {
        Ok(page) => page.items,
        Err(e) => return store_error_response("Failed to query athletes", e),
    };

    // Per-candidate metric lookups: a failure scores that athlete without
    // metrics instead of failing the request
    let mut metrics_by_athlete: HashMap<String, Vec<PlatformMetrics>> = HashMap::new();
    for athlete in &athletes {
        match state.store.athlete_metrics(&athlete.id).await {
            Ok(metrics) => {
                metrics_by_athlete.insert(athlete.id.clone(), metrics);
            }
            Err(e) => {
                tracing::warn!(athlete_id = %athlete.id, error = %e, "failed to fetch metrics");
            }
        }
    }

    let candidates: Vec<AthleteProfile> = match req.min_followers {
        Some(min) => athletes
            .into_iter()
            .filter(|athlete| {
                metrics_by_athlete
                    .get(&athlete.id)
                    .map(|m| crate::models::total_followers(m) >= min)
                    .unwrap_or(false)
            })
            .collect(),
        None => athletes,
    };

    let total_candidates = candidates.len();
    tracing::info!(
        brand_id = %req.brand_id,
        candidates = total_candidates,
        "finding athlete matches"
    );

    match state
        .matcher
        .find_athlete_matches(&brand, &candidates, &metrics_by_athlete, limit)
    {
        Ok(matches) => HttpResponse::Ok().json(MatchListResponse {
            matches,
            total_candidates,
        }),
        Err(e) => scoring_error_response(e),
    }
}

/// Rank brands for an athlete
///
/// POST /api/v1/matching/brands-for-athlete
async fn brands_for_athlete(
    state: web::Data<AppState>,
    req: web::Json<BrandMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let limit = req.limit.min(state.max_limit) as usize;

    let athlete = match state.store.get_athlete(&req.athlete_id).await {
        Ok(athlete) => athlete,
        Err(e) => return store_error_response("Failed to fetch athlete", e),
    };
    let metrics = match state.store.athlete_metrics(&req.athlete_id).await {
        Ok(metrics) => metrics,
        Err(e) => return store_error_response("Failed to fetch athlete metrics", e),
    };

    let mut filter = "verified = true".to_string();
    if let Some(industry) = &req.industry_preference {
        filter.push_str(&format!(" && industry = '{}'", industry));
    }

    let mut brands = match state.store.list_brands(&ListQuery::filtered(filter)).await {
        Ok(page) => page.items,
        Err(e) => return store_error_response("Failed to query brands", e),
    };

    if let Some(min_budget) = req.min_budget {
        brands.retain(|brand| brand.budget_max >= min_budget);
    }

    let total_candidates = brands.len();
    tracing::info!(
        athlete_id = %req.athlete_id,
        candidates = total_candidates,
        "finding brand matches"
    );

    match state
        .matcher
        .find_brand_matches(&athlete, &metrics, &brands, limit)
    {
        Ok(matches) => HttpResponse::Ok().json(MatchListResponse {
            matches,
            total_candidates,
        }),
        Err(e) => scoring_error_response(e),
    }
}

/// Queue match processing for a campaign
///
/// POST /api/v1/campaigns/process
async fn process_campaign(
    state: web::Data<AppState>,
    req: web::Json<ProcessCampaignRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    // Reject unknown campaigns up front; the actual processing is deferred
    if let Err(e) = state.store.get_campaign(&req.campaign_id).await {
        return store_error_response("Failed to fetch campaign", e);
    }

    let processor = state.campaigns.clone();
    let campaign_id = req.campaign_id.clone();
    state.tasks.submit("process-campaign", state.retry, move || {
        let processor = processor.clone();
        let campaign_id = campaign_id.clone();
        async move {
            processor
                .process_campaign(&campaign_id)
                .await
                .map(|_| ())
                .map_err(Into::into)
        }
    });

    HttpResponse::Accepted().json(ProcessCampaignResponse {
        queued: true,
        campaign_id: req.campaign_id.clone(),
    })
}

#[derive(Debug, Deserialize)]
struct TrendingQuery {
    sport: Option<String>,
    limit: Option<usize>,
}

/// Trending athletes by recent engagement momentum
///
/// GET /api/v1/athletes/trending?sport=tennis&limit=10
async fn trending_athletes(
    state: web::Data<AppState>,
    query: web::Query<TrendingQuery>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(10).min(state.max_limit as usize);

    match state
        .trending
        .trending_athletes(query.sport.as_deref(), limit)
        .await
    {
        Ok(athletes) => HttpResponse::Ok().json(TrendingResponse {
            count: athletes.len(),
            athletes,
        }),
        Err(e) => store_error_response("Failed to fetch trending athletes", e),
    }
}
