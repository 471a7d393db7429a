use crate::core::MatchingService;
use crate::embedding::EmbeddingError;
use crate::models::{
    total_followers, AthleteProfile, BrandProfile, Campaign, MatchResult, PlatformMetrics,
};
use crate::services::notify::Notifier;
use crate::services::pocketbase::{ListQuery, PocketBaseClient, StoreError};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that can occur while processing a campaign
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

/// Outcome of processing one campaign
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub campaign_id: String,
    pub athletes_processed: usize,
    pub matches_found: usize,
    pub matches_stored: usize,
    pub top_score: f64,
}

/// Outcome of a sweep over all active campaigns
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSummary {
    pub campaigns_processed: usize,
    pub campaigns_failed: usize,
}

/// Runs AI matching for campaigns and persists the results.
///
/// This is the only component with durable side effects; everything below it
/// is pure computation over snapshots.
pub struct CampaignProcessor {
    store: Arc<PocketBaseClient>,
    matcher: Arc<MatchingService>,
    notifier: Notifier,
    store_limit: usize,
    candidate_page_size: u32,
}

impl CampaignProcessor {
    pub fn new(
        store: Arc<PocketBaseClient>,
        matcher: Arc<MatchingService>,
        notifier: Notifier,
        store_limit: usize,
        candidate_page_size: u32,
    ) -> Self {
        Self {
            store,
            matcher,
            notifier,
            store_limit,
            candidate_page_size,
        }
    }

    /// Process every campaign currently marked active. One failing campaign
    /// does not abort the sweep.
    pub async fn process_active_campaigns(&self) -> Result<BulkSummary, CampaignError> {
        let campaigns = self
            .store
            .list_campaigns(&ListQuery {
                filter: Some("status = 'active'".to_string()),
                per_page: 100,
                ..ListQuery::default()
            })
            .await?;

        let mut processed = 0;
        let mut failed = 0;
        for campaign in campaigns.items {
            match self.process_campaign_record(&campaign).await {
                Ok(_) => processed += 1,
                Err(e) => {
                    error!(campaign_id = %campaign.id, error = %e, "campaign processing failed");
                    failed += 1;
                }
            }
        }

        info!(processed, failed, "bulk matching analysis finished");
        Ok(BulkSummary {
            campaigns_processed: processed,
            campaigns_failed: failed,
        })
    }

    /// Resolve and process a single campaign by id
    pub async fn process_campaign(&self, campaign_id: &str) -> Result<CampaignSummary, CampaignError> {
        let campaign = self.store.get_campaign(campaign_id).await?;
        self.process_campaign_record(&campaign).await
    }

    async fn process_campaign_record(
        &self,
        campaign: &Campaign,
    ) -> Result<CampaignSummary, CampaignError> {
        info!(campaign_id = %campaign.id, "processing campaign matches");

        let brand = self.store.get_brand(&campaign.brand).await?;
        let candidates = self.eligible_athletes(campaign).await?;

        if candidates.is_empty() {
            info!(campaign_id = %campaign.id, "no eligible athletes found");
            return Ok(CampaignSummary {
                campaign_id: campaign.id.clone(),
                athletes_processed: 0,
                matches_found: 0,
                matches_stored: 0,
                top_score: 0.0,
            });
        }

        // Metrics are fetched per candidate; a failed lookup scores the
        // athlete without metrics rather than dropping them
        let mut metrics_by_athlete: HashMap<String, Vec<PlatformMetrics>> = HashMap::new();
        for athlete in &candidates {
            match self.store.athlete_metrics(&athlete.id).await {
                Ok(metrics) => {
                    metrics_by_athlete.insert(athlete.id.clone(), metrics);
                }
                Err(e) => {
                    warn!(athlete_id = %athlete.id, error = %e, "failed to fetch metrics");
                }
            }
        }

        let candidates: Vec<AthleteProfile> = match campaign.min_followers {
            Some(min) => candidates
                .into_iter()
                .filter(|athlete| {
                    metrics_by_athlete
                        .get(&athlete.id)
                        .map(|m| total_followers(m) >= min)
                        .unwrap_or(false)
                })
                .collect(),
            None => candidates,
        };

        let athletes_processed = candidates.len();
        let matches = self.matcher.find_athlete_matches(
            &brand,
            &candidates,
            &metrics_by_athlete,
            self.store_limit,
        )?;

        let matches_stored = self.store_matches(campaign, &brand, &matches).await;
        let top_score = matches.first().map(|m| m.overall_score).unwrap_or(0.0);

        let bookkeeping = json!({
            "last_match_processing": chrono::Utc::now().to_rfc3339(),
            "total_matches": matches_stored,
        });
        if let Err(e) = self
            .store
            .update_record(
                &self.store.collections().campaigns.clone(),
                &campaign.id,
                &bookkeeping,
            )
            .await
        {
            error!(campaign_id = %campaign.id, error = %e, "failed to update campaign record");
        }

        if matches_stored > 0 {
            if let Some(user) = &brand.user {
                let payload = json!({
                    "campaign_id": campaign.id,
                    "campaign_name": campaign.name,
                    "matches_count": matches_stored,
                    "top_score": top_score,
                });
                if let Err(e) = self.notifier.send(user, "new_matches_available", payload).await {
                    error!(campaign_id = %campaign.id, error = %e, "failed to notify brand");
                }
            }
        }

        info!(
            campaign_id = %campaign.id,
            athletes_processed,
            matches_found = matches.len(),
            matches_stored,
            "campaign matches processed"
        );

        Ok(CampaignSummary {
            campaign_id: campaign.id.clone(),
            athletes_processed,
            matches_found: matches.len(),
            matches_stored,
            top_score,
        })
    }

    /// Active athletes narrowed by the campaign's sport/location targeting
    async fn eligible_athletes(
        &self,
        campaign: &Campaign,
    ) -> Result<Vec<AthleteProfile>, StoreError> {
        let mut filter_parts = vec!["status = 'active'".to_string()];

        if !campaign.target_sports.is_empty() {
            let sports = campaign
                .target_sports
                .iter()
                .map(|sport| format!("sport = '{}'", sport))
                .collect::<Vec<_>>()
                .join(" || ");
            filter_parts.push(format!("({})", sports));
        }

        if !campaign.target_locations.is_empty() {
            let locations = campaign
                .target_locations
                .iter()
                .map(|location| format!("location ~ '{}'", location))
                .collect::<Vec<_>>()
                .join(" || ");
            filter_parts.push(format!("({})", locations));
        }

        let page = self
            .store
            .list_athletes(&ListQuery {
                filter: Some(filter_parts.join(" && ")),
                per_page: self.candidate_page_size,
                ..ListQuery::default()
            })
            .await?;

        Ok(page.items)
    }

    /// Upsert matches keyed by (campaign, athlete). A failed row is logged
    /// and skipped; the rest of the batch still lands.
    async fn store_matches(
        &self,
        campaign: &Campaign,
        brand: &BrandProfile,
        matches: &[MatchResult],
    ) -> usize {
        let collection = self.store.collections().matches.clone();

        let mut stored = 0;
        for m in matches {
            let data = json!({
                "campaign": campaign.id,
                "athlete": m.counterpart_id,
                "brand": brand.id,
                "overall_score": m.overall_score,
                "semantic_similarity": m.semantic_similarity,
                "factors": m.factors,
                "estimated_rate": m.estimated_rate.unwrap_or(0.0),
                "total_followers": m.total_followers,
                "status": "pending",
                "ai_recommendation": m.recommendation,
                "updated": chrono::Utc::now().to_rfc3339(),
            });
            let filter = format!(
                "campaign = '{}' && athlete = '{}'",
                campaign.id, m.counterpart_id
            );

            match self.store.upsert_by_filter(&collection, &filter, &data).await {
                Ok(_) => stored += 1,
                Err(e) => {
                    error!(
                        campaign_id = %campaign.id,
                        athlete_id = %m.counterpart_id,
                        error = %e,
                        "failed to store match"
                    );
                }
            }
        }

        stored
    }
}
