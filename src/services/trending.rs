use crate::models::{AthleteProfile, TrendingAthlete};
use crate::services::pocketbase::{ListQuery, PocketBaseClient, StoreError};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

/// Metrics row with its athlete relation expanded
#[derive(Debug, Clone, Deserialize)]
struct MetricRecord {
    #[serde(default)]
    followers: u64,
    #[serde(default)]
    engagement_rate: f64,
    #[serde(default)]
    expand: Option<MetricExpand>,
}

#[derive(Debug, Clone, Deserialize)]
struct MetricExpand {
    #[serde(default)]
    athlete: Option<AthleteProfile>,
}

/// Ranks athletes by recent engagement momentum
pub struct TrendingService {
    store: Arc<PocketBaseClient>,
    window_days: i64,
}

impl TrendingService {
    pub fn new(store: Arc<PocketBaseClient>, window_days: i64) -> Self {
        Self { store, window_days }
    }

    /// Trending athletes from metrics updated within the look-back window.
    /// `trend_score = engagement_rate * followers / 1000`.
    pub async fn trending_athletes(
        &self,
        sport: Option<&str>,
        limit: usize,
    ) -> Result<Vec<TrendingAthlete>, StoreError> {
        let since = chrono::Utc::now() - chrono::Duration::days(self.window_days);
        let mut filter = format!("updated >= '{}'", since.format("%Y-%m-%d %H:%M:%S"));
        if let Some(sport) = sport {
            filter.push_str(&format!(" && athlete.sport = '{}'", sport));
        }

        let page = self
            .store
            .list_records::<MetricRecord>(
                &self.store.collections().athlete_metrics.clone(),
                &ListQuery {
                    filter: Some(filter),
                    sort: Some("-engagement_rate".to_string()),
                    expand: Some("athlete".to_string()),
                    per_page: (limit * 2).max(1) as u32,
                    ..ListQuery::default()
                },
            )
            .await?;

        let mut trending: Vec<TrendingAthlete> = Vec::new();
        for record in page.items {
            if trending.len() >= limit {
                break;
            }
            let athlete = match record.expand.as_ref().and_then(|e| e.athlete.as_ref()) {
                Some(athlete) => athlete,
                None => continue,
            };
            if trending.iter().any(|t| t.athlete_id == athlete.id) {
                continue;
            }

            trending.push(TrendingAthlete {
                athlete_id: athlete.id.clone(),
                name: athlete.full_name(),
                sport: athlete.sport.clone(),
                followers: record.followers,
                engagement_rate: record.engagement_rate,
                trend_score: record.engagement_rate * (record.followers as f64 / 1000.0),
            });
        }

        Ok(trending)
    }

    /// Recompute the trending ranking and persist it, one row per athlete
    pub async fn refresh(&self, limit: usize) -> Result<usize, StoreError> {
        let trending = self.trending_athletes(None, limit).await?;
        let collection = self.store.collections().trending.clone();

        let mut stored = 0;
        for entry in &trending {
            let data = json!({
                "athlete": entry.athlete_id,
                "name": entry.name,
                "sport": entry.sport,
                "followers": entry.followers,
                "engagement_rate": entry.engagement_rate,
                "trend_score": entry.trend_score,
                "updated": chrono::Utc::now().to_rfc3339(),
            });
            let filter = format!("athlete = '{}'", entry.athlete_id);
            match self.store.upsert_by_filter(&collection, &filter, &data).await {
                Ok(_) => stored += 1,
                Err(e) => {
                    error!(athlete_id = %entry.athlete_id, error = %e, "failed to store trending entry");
                }
            }
        }

        info!(count = stored, "trending athletes updated");
        Ok(stored)
    }
}
