use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Athlete record snapshot, as stored in the `athletes` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub sport: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default = "default_true")]
    pub nil_eligible: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub status: String,
    /// Owning user record id, for notification routing
    #[serde(default)]
    pub user: Option<String>,
}

impl Default for AthleteProfile {
    fn default() -> Self {
        Self {
            id: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            sport: String::new(),
            school: String::new(),
            location: String::new(),
            bio: String::new(),
            age: None,
            gender: None,
            nil_eligible: true,
            verified: false,
            status: String::new(),
            user: None,
        }
    }
}

impl AthleteProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Brand record snapshot, as stored in the `brands` collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub preferred_sports: Vec<String>,
    #[serde(default)]
    pub target_demographics: Option<TargetDemographics>,
    #[serde(default)]
    pub budget_min: f64,
    #[serde(default)]
    pub budget_max: f64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub user: Option<String>,
}

/// Brand audience targeting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetDemographics {
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub income_level: Option<String>,
}

impl TargetDemographics {
    /// True when no targeting dimension is set at all
    pub fn is_empty(&self) -> bool {
        self.age_group.is_none()
            && self.gender.is_none()
            && self.interests.is_empty()
            && self.income_level.is_none()
    }
}

/// Per-platform social media metrics for an athlete
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformMetrics {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub engagement_rate: f64,
    #[serde(default)]
    pub content_categories: Vec<String>,
}

/// Sum of followers across all platforms
pub fn total_followers(metrics: &[PlatformMetrics]) -> u64 {
    metrics.iter().map(|m| m.followers).sum()
}

/// Mean engagement rate across platforms, 0.0 when no metrics exist
pub fn mean_engagement(metrics: &[PlatformMetrics]) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }
    metrics.iter().map(|m| m.engagement_rate).sum::<f64>() / metrics.len() as f64
}

/// Distinct content categories across platforms, first-seen order
pub fn distinct_categories(metrics: &[PlatformMetrics]) -> Vec<String> {
    let mut seen = Vec::new();
    for m in metrics {
        for category in &m.content_categories {
            if !seen.contains(category) {
                seen.push(category.clone());
            }
        }
    }
    seen
}

/// The fixed set of compatibility sub-scores, each in [0, 100]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityFactors {
    pub sport_alignment: f64,
    pub audience_match: f64,
    pub engagement_quality: f64,
    pub budget_compatibility: f64,
    pub location_proximity: f64,
    pub brand_safety: f64,
}

impl CompatibilityFactors {
    /// Name/value pairs in declaration order, for reporting
    pub fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("sport_alignment", self.sport_alignment),
            ("audience_match", self.audience_match),
            ("engagement_quality", self.engagement_quality),
            ("budget_compatibility", self.budget_compatibility),
            ("location_proximity", self.location_proximity),
            ("brand_safety", self.brand_safety),
        ]
    }
}

/// Scoring weights, must sum to 1.0 across all seven terms
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub semantic_similarity: f64,
    pub sport_alignment: f64,
    pub audience_match: f64,
    pub engagement_quality: f64,
    pub budget_compatibility: f64,
    pub location_proximity: f64,
    pub brand_safety: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            semantic_similarity: 0.25,
            sport_alignment: 0.20,
            audience_match: 0.20,
            engagement_quality: 0.15,
            budget_compatibility: 0.10,
            location_proximity: 0.05,
            brand_safety: 0.05,
        }
    }
}

/// One scored athlete/brand pairing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub counterpart_id: String,
    pub counterpart_name: String,
    pub overall_score: f64,
    /// Cosine similarity of the profile embeddings, scaled to [0, 100]
    pub semantic_similarity: f64,
    pub factors: CompatibilityFactors,
    pub recommendation: String,
    pub risk_factors: Vec<String>,
    pub optimization_suggestions: Vec<String>,
    pub estimated_rate: Option<f64>,
    pub total_followers: u64,
}

/// Detailed single-pair compatibility analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    pub overall_score: f64,
    pub semantic_similarity: f64,
    pub factors: CompatibilityFactors,
    pub recommendation: String,
    pub estimated_success_rate: f64,
    pub risk_factors: Vec<String>,
    pub optimization_suggestions: Vec<String>,
    pub estimated_rate: f64,
}

/// Campaign record snapshot, as stored in the `campaigns` collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Brand record id
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub target_sports: Vec<String>,
    #[serde(default)]
    pub target_locations: Vec<String>,
    #[serde(default)]
    pub min_followers: Option<u64>,
}

/// Athlete ranked by recent engagement momentum
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingAthlete {
    pub athlete_id: String,
    pub name: String,
    pub sport: String,
    pub followers: u64,
    pub engagement_rate: f64,
    pub trend_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_aggregation() {
        let metrics = vec![
            PlatformMetrics {
                platform: "instagram".to_string(),
                followers: 10_000,
                engagement_rate: 4.0,
                content_categories: vec!["fitness".to_string(), "lifestyle".to_string()],
            },
            PlatformMetrics {
                platform: "tiktok".to_string(),
                followers: 15_000,
                engagement_rate: 8.0,
                content_categories: vec!["fitness".to_string(), "comedy".to_string()],
            },
        ];

        assert_eq!(total_followers(&metrics), 25_000);
        assert!((mean_engagement(&metrics) - 6.0).abs() < f64::EPSILON);
        assert_eq!(
            distinct_categories(&metrics),
            vec!["fitness", "lifestyle", "comedy"]
        );
    }

    #[test]
    fn test_empty_metrics() {
        assert_eq!(total_followers(&[]), 0);
        assert_eq!(mean_engagement(&[]), 0.0);
        assert!(distinct_categories(&[]).is_empty());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoringWeights::default();
        let sum = w.semantic_similarity
            + w.sport_alignment
            + w.audience_match
            + w.engagement_quality
            + w.budget_compatibility
            + w.location_proximity
            + w.brand_safety;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_record_deserializes() {
        let athlete: AthleteProfile = serde_json::from_str("{}").unwrap();
        assert!(athlete.nil_eligible);
        assert!(athlete.sport.is_empty());

        let brand: BrandProfile = serde_json::from_str(r#"{"company_name":"Acme"}"#).unwrap();
        assert_eq!(brand.company_name, "Acme");
        assert_eq!(brand.budget_max, 0.0);
    }
}
