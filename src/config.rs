use crate::models::ScoringWeights;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub pocketbase: PocketBaseSettings,
    #[serde(default)]
    pub collection: CollectionSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub worker: WorkerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct PocketBaseSettings {
    #[serde(default = "default_pb_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub admin_token: String,
}

impl Default for PocketBaseSettings {
    fn default() -> Self {
        Self {
            endpoint: default_pb_endpoint(),
            admin_token: String::new(),
        }
    }
}

fn default_pb_endpoint() -> String {
    "http://localhost:8090".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "default_athletes")]
    pub athletes: String,
    #[serde(default = "default_brands")]
    pub brands: String,
    #[serde(default = "default_athlete_metrics")]
    pub athlete_metrics: String,
    #[serde(default = "default_campaigns")]
    pub campaigns: String,
    #[serde(default = "default_matches")]
    pub matches: String,
    #[serde(default = "default_notifications")]
    pub notifications: String,
    #[serde(default = "default_trending")]
    pub trending: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            athletes: default_athletes(),
            brands: default_brands(),
            athlete_metrics: default_athlete_metrics(),
            campaigns: default_campaigns(),
            matches: default_matches(),
            notifications: default_notifications(),
            trending: default_trending(),
        }
    }
}

fn default_athletes() -> String {
    "athletes".to_string()
}
fn default_brands() -> String {
    "brands".to_string()
}
fn default_athlete_metrics() -> String {
    "athlete_metrics".to_string()
}
fn default_campaigns() -> String {
    "campaigns".to_string()
}
fn default_matches() -> String {
    "matches".to_string()
}
fn default_notifications() -> String {
    "notifications".to_string()
}
fn default_trending() -> String {
    "trending_athletes".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Minimum overall score for a match to be kept
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,
    #[serde(default = "default_match_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    /// How many matches a campaign run persists
    #[serde(default = "default_campaign_store_limit")]
    pub campaign_store_limit: usize,
    /// Candidate page size when pulling athletes for a campaign
    #[serde(default = "default_candidate_page_size")]
    pub candidate_page_size: u32,
    /// Look-back window for trending athletes, in days
    #[serde(default = "default_trending_window_days")]
    pub trending_window_days: i64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            score_threshold: default_score_threshold(),
            default_limit: default_match_limit(),
            max_limit: default_max_limit(),
            campaign_store_limit: default_campaign_store_limit(),
            candidate_page_size: default_candidate_page_size(),
            trending_window_days: default_trending_window_days(),
        }
    }
}

fn default_score_threshold() -> f64 {
    70.0
}
fn default_match_limit() -> u16 {
    10
}
fn default_max_limit() -> u16 {
    50
}
fn default_campaign_store_limit() -> usize {
    50
}
fn default_candidate_page_size() -> u32 {
    500
}
fn default_trending_window_days() -> i64 {
    7
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    /// Dollars per follower used for rate estimation
    #[serde(default = "default_rate_per_follower")]
    pub rate_per_follower: f64,
    /// Subtracted from the overall score to estimate success rate
    #[serde(default = "default_success_rate_offset")]
    pub success_rate_offset: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            rate_per_follower: default_rate_per_follower(),
            success_rate_offset: default_success_rate_offset(),
        }
    }
}

fn default_rate_per_follower() -> f64 {
    0.01
}
fn default_success_rate_offset() -> f64 {
    5.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_semantic_weight")]
    pub semantic_similarity: f64,
    #[serde(default = "default_sport_weight")]
    pub sport_alignment: f64,
    #[serde(default = "default_audience_weight")]
    pub audience_match: f64,
    #[serde(default = "default_engagement_weight")]
    pub engagement_quality: f64,
    #[serde(default = "default_budget_weight")]
    pub budget_compatibility: f64,
    #[serde(default = "default_location_weight")]
    pub location_proximity: f64,
    #[serde(default = "default_safety_weight")]
    pub brand_safety: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            semantic_similarity: default_semantic_weight(),
            sport_alignment: default_sport_weight(),
            audience_match: default_audience_weight(),
            engagement_quality: default_engagement_weight(),
            budget_compatibility: default_budget_weight(),
            location_proximity: default_location_weight(),
            brand_safety: default_safety_weight(),
        }
    }
}

impl From<WeightsConfig> for ScoringWeights {
    fn from(value: WeightsConfig) -> Self {
        ScoringWeights {
            semantic_similarity: value.semantic_similarity,
            sport_alignment: value.sport_alignment,
            audience_match: value.audience_match,
            engagement_quality: value.engagement_quality,
            budget_compatibility: value.budget_compatibility,
            location_proximity: value.location_proximity,
            brand_safety: value.brand_safety,
        }
    }
}

fn default_semantic_weight() -> f64 {
    0.25
}
fn default_sport_weight() -> f64 {
    0.20
}
fn default_audience_weight() -> f64 {
    0.20
}
fn default_engagement_weight() -> f64 {
    0.15
}
fn default_budget_weight() -> f64 {
    0.10
}
fn default_location_weight() -> f64 {
    0.05
}
fn default_safety_weight() -> f64 {
    0.05
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_tokenizer_path")]
    pub tokenizer_path: String,
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// In-process cache entries for computed embeddings
    #[serde(default = "default_embedding_cache_size")]
    pub cache_size: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            tokenizer_path: default_tokenizer_path(),
            dimensions: default_dimensions(),
            max_length: default_max_length(),
            cache_size: default_embedding_cache_size(),
        }
    }
}

fn default_model_path() -> String {
    "models/all-MiniLM-L6-v2.safetensors".to_string()
}
fn default_tokenizer_path() -> String {
    "models/minilm-tokenizer.json".to_string()
}
fn default_dimensions() -> usize {
    384
}
fn default_max_length() -> usize {
    256
}
fn default_embedding_cache_size() -> u64 {
    2048
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff in seconds, doubled per retry attempt
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
    #[serde(default = "default_campaign_interval_secs")]
    pub campaign_interval_secs: u64,
    #[serde(default = "default_trending_interval_secs")]
    pub trending_interval_secs: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_secs: default_backoff_secs(),
            campaign_interval_secs: default_campaign_interval_secs(),
            trending_interval_secs: default_trending_interval_secs(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}
fn default_backoff_secs() -> u64 {
    60
}
fn default_campaign_interval_secs() -> u64 {
    3600
}
fn default_trending_interval_secs() -> u64 {
    1800
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with NILMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g. NILMATCH_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("NILMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("NILMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
