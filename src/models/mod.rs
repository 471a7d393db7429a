// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    distinct_categories, mean_engagement, total_followers, AthleteProfile, BrandProfile, Campaign,
    CompatibilityFactors, CompatibilityReport, MatchResult, PlatformMetrics, ScoringWeights,
    TargetDemographics, TrendingAthlete,
};
pub use requests::{
    AthleteMatchRequest, BrandMatchRequest, CompatibilityRequest, ProcessCampaignRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, MatchListResponse, ProcessCampaignResponse, TrendingResponse,
};
