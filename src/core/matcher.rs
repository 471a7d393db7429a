use crate::core::{factors, scoring, text};
use crate::embedding::{EmbeddingEngine, EmbeddingError};
use crate::models::{
    mean_engagement, total_followers, AthleteProfile, BrandProfile, CompatibilityReport,
    MatchResult, PlatformMetrics, ScoringWeights,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tunables for the matching pipeline
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    pub weights: ScoringWeights,
    /// Minimum overall score for bulk results
    pub score_threshold: f64,
    pub rate_per_follower: f64,
    pub success_rate_offset: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            score_threshold: 70.0,
            rate_per_follower: 0.01,
            success_rate_offset: 5.0,
        }
    }
}

/// Filter, sort descending by overall score and truncate to `limit`
pub fn rank_matches(matches: Vec<MatchResult>, threshold: f64, limit: usize) -> Vec<MatchResult> {
    let mut ranked: Vec<MatchResult> = matches
        .into_iter()
        .filter(|m| m.overall_score >= threshold)
        .collect();

    ranked.sort_by(|a, b| {
        b.overall_score
            .partial_cmp(&a.overall_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked.truncate(limit);
    ranked
}

/// Matching engine combining semantic similarity with rule-based factors.
///
/// All scoring is pure computation over the snapshots passed in; the only
/// shared state is the embedding engine, which is read-only once loaded.
pub struct MatchingService {
    embedder: Arc<EmbeddingEngine>,
    config: MatcherConfig,
}

impl MatchingService {
    pub fn new(embedder: Arc<EmbeddingEngine>, config: MatcherConfig) -> Self {
        Self { embedder, config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.embedder.is_ready()
    }

    /// Detailed compatibility analysis for a single athlete/brand pair.
    ///
    /// Dependency failures (model not loaded) propagate to the caller; this
    /// is the one operation that must fail loudly rather than degrade.
    pub fn calculate_compatibility(
        &self,
        athlete: &AthleteProfile,
        brand: &BrandProfile,
        metrics: &[PlatformMetrics],
    ) -> Result<CompatibilityReport, EmbeddingError> {
        let athlete_embedding = self
            .embedder
            .embed(&text::render_athlete_profile(athlete, metrics))?;
        let brand_embedding = self.embedder.embed(&text::render_brand_profile(brand))?;
        let similarity =
            EmbeddingEngine::similarity(&athlete_embedding, &brand_embedding)? as f64;

        let factors =
            factors::compute_factors(athlete, brand, metrics, self.config.rate_per_follower);
        let overall_score = scoring::aggregate_score(&factors, similarity, &self.config.weights);

        let estimated_rate = factors::estimate_athlete_rate(
            total_followers(metrics),
            mean_engagement(metrics),
            self.config.rate_per_follower,
        );

        debug!(
            athlete_id = %athlete.id,
            brand_id = %brand.id,
            score = overall_score,
            "compatibility calculated"
        );

        Ok(CompatibilityReport {
            overall_score,
            semantic_similarity: similarity * 100.0,
            factors,
            recommendation: scoring::generate_recommendation(overall_score, &factors),
            estimated_success_rate: scoring::estimated_success_rate(
                overall_score,
                self.config.success_rate_offset,
            ),
            risk_factors: scoring::assess_risk_factors(athlete, &factors),
            optimization_suggestions: scoring::optimization_suggestions(&factors),
            estimated_rate,
        })
    }

    /// Rank athlete candidates for a brand.
    ///
    /// A failure on one candidate skips that candidate and never aborts the
    /// batch; only a failure to embed the brand itself is fatal.
    pub fn find_athlete_matches(
        &self,
        brand: &BrandProfile,
        candidates: &[AthleteProfile],
        metrics_by_athlete: &HashMap<String, Vec<PlatformMetrics>>,
        limit: usize,
    ) -> Result<Vec<MatchResult>, EmbeddingError> {
        let brand_embedding = self.embedder.embed(&text::render_brand_profile(brand))?;

        let mut matches = Vec::new();
        for athlete in candidates {
            let metrics = metrics_by_athlete
                .get(&athlete.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            match self.score_pair(athlete, brand, metrics, &brand_embedding) {
                Ok(mut result) => {
                    result.counterpart_id = athlete.id.clone();
                    result.counterpart_name = athlete.full_name();
                    matches.push(result);
                }
                Err(e) => {
                    warn!(athlete_id = %athlete.id, error = %e, "skipping candidate");
                }
            }
        }

        Ok(rank_matches(matches, self.config.score_threshold, limit))
    }

    /// Rank brand candidates for an athlete
    pub fn find_brand_matches(
        &self,
        athlete: &AthleteProfile,
        metrics: &[PlatformMetrics],
        brands: &[BrandProfile],
        limit: usize,
    ) -> Result<Vec<MatchResult>, EmbeddingError> {
        let athlete_embedding = self
            .embedder
            .embed(&text::render_athlete_profile(athlete, metrics))?;

        let mut matches = Vec::new();
        for brand in brands {
            let scored = self
                .embedder
                .embed(&text::render_brand_profile(brand))
                .and_then(|brand_embedding| {
                    EmbeddingEngine::similarity(&athlete_embedding, &brand_embedding)
                })
                .map(|similarity| self.build_result(athlete, brand, metrics, similarity as f64));

            match scored {
                Ok(mut result) => {
                    result.counterpart_id = brand.id.clone();
                    result.counterpart_name = brand.company_name.clone();
                    matches.push(result);
                }
                Err(e) => {
                    warn!(brand_id = %brand.id, error = %e, "skipping candidate");
                }
            }
        }

        Ok(rank_matches(matches, self.config.score_threshold, limit))
    }

    fn score_pair(
        &self,
        athlete: &AthleteProfile,
        brand: &BrandProfile,
        metrics: &[PlatformMetrics],
        brand_embedding: &[f32],
    ) -> Result<MatchResult, EmbeddingError> {
        let athlete_embedding = self
            .embedder
            .embed(&text::render_athlete_profile(athlete, metrics))?;
        let similarity = EmbeddingEngine::similarity(&athlete_embedding, brand_embedding)? as f64;
        Ok(self.build_result(athlete, brand, metrics, similarity))
    }

    fn build_result(
        &self,
        athlete: &AthleteProfile,
        brand: &BrandProfile,
        metrics: &[PlatformMetrics],
        similarity: f64,
    ) -> MatchResult {
        let factors =
            factors::compute_factors(athlete, brand, metrics, self.config.rate_per_follower);
        let overall_score = scoring::aggregate_score(&factors, similarity, &self.config.weights);

        let followers = total_followers(metrics);
        let estimated_rate = if metrics.is_empty() {
            None
        } else {
            Some(factors::estimate_athlete_rate(
                followers,
                mean_engagement(metrics),
                self.config.rate_per_follower,
            ))
        };

        MatchResult {
            counterpart_id: String::new(),
            counterpart_name: String::new(),
            overall_score,
            semantic_similarity: similarity * 100.0,
            factors,
            recommendation: scoring::generate_recommendation(overall_score, &factors),
            risk_factors: scoring::assess_risk_factors(athlete, &factors),
            optimization_suggestions: scoring::optimization_suggestions(&factors),
            estimated_rate,
            total_followers: followers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmbeddingSettings;
    use crate::models::CompatibilityFactors;

    fn result_with_score(id: &str, score: f64) -> MatchResult {
        MatchResult {
            counterpart_id: id.to_string(),
            counterpart_name: id.to_string(),
            overall_score: score,
            semantic_similarity: 50.0,
            factors: CompatibilityFactors::default(),
            recommendation: String::new(),
            risk_factors: vec![],
            optimization_suggestions: vec![],
            estimated_rate: None,
            total_followers: 0,
        }
    }

    #[test]
    fn test_rank_matches_sorted_and_filtered() {
        let matches = vec![
            result_with_score("a", 72.0),
            result_with_score("b", 95.0),
            result_with_score("c", 40.0),
            result_with_score("d", 88.0),
        ];

        let ranked = rank_matches(matches, 70.0, 10);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].counterpart_id, "b");
        assert_eq!(ranked[1].counterpart_id, "d");
        assert_eq!(ranked[2].counterpart_id, "a");
        assert!(ranked.iter().all(|m| m.overall_score >= 70.0));
    }

    #[test]
    fn test_rank_matches_respects_limit() {
        let matches = (0..20)
            .map(|i| result_with_score(&i.to_string(), 70.0 + i as f64))
            .collect();
        let ranked = rank_matches(matches, 70.0, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].overall_score, 89.0);
    }

    #[test]
    fn test_unloaded_model_is_fatal_for_single_pair() {
        let engine = Arc::new(EmbeddingEngine::new(EmbeddingSettings {
            model_path: "missing.safetensors".to_string(),
            tokenizer_path: "missing.json".to_string(),
            ..EmbeddingSettings::default()
        }));
        let service = MatchingService::new(engine, MatcherConfig::default());

        let athlete = AthleteProfile {
            sport: "tennis".to_string(),
            ..AthleteProfile::default()
        };
        let brand = BrandProfile::default();

        let result = service.calculate_compatibility(&athlete, &brand, &[]);
        assert!(matches!(result, Err(EmbeddingError::ModelNotReady(_))));
    }

    #[test]
    fn test_unloaded_model_is_fatal_for_bulk_subject() {
        let engine = Arc::new(EmbeddingEngine::new(EmbeddingSettings {
            model_path: "missing.safetensors".to_string(),
            tokenizer_path: "missing.json".to_string(),
            ..EmbeddingSettings::default()
        }));
        let service = MatchingService::new(engine, MatcherConfig::default());

        let brand = BrandProfile::default();
        let result =
            service.find_athlete_matches(&brand, &[], &HashMap::new(), 10);
        assert!(matches!(result, Err(EmbeddingError::ModelNotReady(_))));
    }
}
