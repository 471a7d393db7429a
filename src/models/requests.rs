use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_limit() -> u16 {
    10
}

/// Request for a detailed athlete/brand compatibility analysis
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompatibilityRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "athlete_id", rename = "athleteId")]
    pub athlete_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "brand_id", rename = "brandId")]
    pub brand_id: String,
}

/// Request to rank athletes for a brand
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AthleteMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "brand_id", rename = "brandId")]
    pub brand_id: String,
    #[serde(default, alias = "sport_filter", rename = "sportFilter")]
    pub sport_filter: Option<String>,
    #[serde(default, alias = "min_followers", rename = "minFollowers")]
    pub min_followers: Option<u64>,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

/// Request to rank brands for an athlete
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BrandMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "athlete_id", rename = "athleteId")]
    pub athlete_id: String,
    #[serde(default, alias = "industry_preference", rename = "industryPreference")]
    pub industry_preference: Option<String>,
    #[serde(default, alias = "min_budget", rename = "minBudget")]
    pub min_budget: Option<f64>,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

/// Request to queue match processing for one campaign
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProcessCampaignRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "campaign_id", rename = "campaignId")]
    pub campaign_id: String,
}
