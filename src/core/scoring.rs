use crate::models::{AthleteProfile, CompatibilityFactors, ScoringWeights};

/// Combine factor scores and semantic similarity into one overall score.
///
/// `semantic_similarity` is the raw cosine value in [-1, 1]; it is scaled to
/// the 0-100 range before weighting. The result is clamped to [0, 100].
pub fn aggregate_score(
    factors: &CompatibilityFactors,
    semantic_similarity: f64,
    weights: &ScoringWeights,
) -> f64 {
    let score = semantic_similarity * 100.0 * weights.semantic_similarity
        + factors.sport_alignment * weights.sport_alignment
        + factors.audience_match * weights.audience_match
        + factors.engagement_quality * weights.engagement_quality
        + factors.budget_compatibility * weights.budget_compatibility
        + factors.location_proximity * weights.location_proximity
        + factors.brand_safety * weights.brand_safety;

    score.clamp(0.0, 100.0)
}

/// Human-readable partnership recommendation for a scored pair
pub fn generate_recommendation(overall_score: f64, factors: &CompatibilityFactors) -> String {
    if overall_score >= 85.0 {
        "Excellent match! Strong compatibility across all key factors. Highly recommended for partnership."
            .to_string()
    } else if overall_score >= 70.0 {
        "Good match with solid alignment. Recommended with standard negotiation approach."
            .to_string()
    } else if overall_score >= 55.0 {
        let weak: Vec<&str> = factors
            .named()
            .into_iter()
            .filter(|(_, value)| *value < 50.0)
            .take(2)
            .map(|(name, _)| name)
            .collect();
        if weak.is_empty() {
            "Moderate match. Standard due diligence recommended.".to_string()
        } else {
            format!(
                "Moderate match. Consider addressing {} before proceeding.",
                weak.join(", ")
            )
        }
    } else {
        "Low compatibility. Significant alignment issues detected. Consider alternative partnerships."
            .to_string()
    }
}

/// Risk catalog keyed by per-factor thresholds; order follows check sequence
pub fn assess_risk_factors(
    athlete: &AthleteProfile,
    factors: &CompatibilityFactors,
) -> Vec<String> {
    let mut risks = Vec::new();

    if factors.engagement_quality < 40.0 {
        risks.push("Low social media engagement may limit campaign reach".to_string());
    }
    if factors.budget_compatibility < 30.0 {
        risks.push("Significant budget mismatch - athlete may be overpriced".to_string());
    }
    if factors.sport_alignment < 50.0 {
        risks.push("Poor sport-industry alignment may confuse target audience".to_string());
    }
    if factors.location_proximity < 40.0 {
        risks.push("Geographic distance may complicate campaign logistics".to_string());
    }
    if factors.brand_safety < 60.0 {
        risks.push("Brand safety concerns detected - additional vetting recommended".to_string());
    }
    if !athlete.nil_eligible {
        risks.push("NIL eligibility issues - legal review required".to_string());
    }

    risks
}

/// Improvement suggestions, one per under-threshold factor
pub fn optimization_suggestions(factors: &CompatibilityFactors) -> Vec<String> {
    let mut suggestions = Vec::new();

    if factors.engagement_quality < 60.0 {
        suggestions
            .push("Focus on content strategy improvement to boost engagement rates".to_string());
    }
    if factors.budget_compatibility < 70.0 {
        suggestions.push(
            "Consider performance-based compensation to align with budget constraints".to_string(),
        );
    }
    if factors.audience_match < 60.0 {
        suggestions
            .push("Develop targeted content that appeals to brand's core demographics".to_string());
    }
    if factors.location_proximity < 50.0 {
        suggestions
            .push("Plan virtual campaign elements to overcome geographic limitations".to_string());
    }
    if factors.sport_alignment < 70.0 {
        suggestions.push("Create crossover content that bridges sport and brand industry".to_string());
    }

    suggestions
}

/// Predicted campaign success rate, clamped to [10, 95]
pub fn estimated_success_rate(overall_score: f64, offset: f64) -> f64 {
    (overall_score - offset).clamp(10.0, 95.0)
}
