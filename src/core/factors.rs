use crate::models::{
    mean_engagement, total_followers, AthleteProfile, BrandProfile, CompatibilityFactors,
    PlatformMetrics,
};

/// Industry -> per-sport affinity scores, hand-authored and asymmetric
const INDUSTRY_SPORT_AFFINITY: &[(&str, &[(&str, f64)])] = &[
    (
        "sports_apparel",
        &[
            ("basketball", 100.0),
            ("soccer", 95.0),
            ("tennis", 90.0),
            ("swimming", 85.0),
            ("football", 100.0),
        ],
    ),
    (
        "fitness",
        &[
            ("basketball", 85.0),
            ("soccer", 80.0),
            ("tennis", 90.0),
            ("swimming", 100.0),
            ("track", 95.0),
        ],
    ),
    (
        "nutrition",
        &[
            ("basketball", 70.0),
            ("soccer", 75.0),
            ("swimming", 90.0),
            ("track", 85.0),
            ("football", 80.0),
        ],
    ),
    (
        "automotive",
        &[
            ("football", 85.0),
            ("basketball", 70.0),
            ("golf", 80.0),
            ("baseball", 60.0),
        ],
    ),
    (
        "technology",
        &[
            ("basketball", 75.0),
            ("soccer", 70.0),
            ("tennis", 65.0),
            ("swimming", 60.0),
        ],
    ),
];

/// Default score for a sport missing from a known industry's affinity row
const AFFINITY_ROW_DEFAULT: f64 = 40.0;

/// Sport -> industries it pairs naturally with
const SPORT_COMPATIBLE_INDUSTRIES: &[(&str, &[&str])] = &[
    ("basketball", &["basketball", "sports_apparel", "fitness", "nutrition"]),
    ("soccer", &["soccer", "football", "sports_apparel", "fitness"]),
    ("tennis", &["tennis", "sports_apparel", "fitness", "luxury"]),
    ("swimming", &["swimming", "fitness", "nutrition", "sports_apparel"]),
    ("football", &["football", "sports_apparel", "fitness", "automotive"]),
    ("baseball", &["baseball", "sports_apparel", "food_beverage"]),
    ("golf", &["golf", "luxury", "financial", "automotive"]),
    ("track", &["track", "sports_apparel", "fitness", "nutrition"]),
];

const RED_FLAG_KEYWORDS: &[&str] = &[
    "controversial",
    "scandal",
    "arrest",
    "lawsuit",
    "drugs",
    "alcohol",
    "violence",
    "inappropriate",
    "suspended",
    "banned",
    "violation",
];

const MODERATE_RISK_KEYWORDS: &[&str] = &[
    "party", "wild", "crazy", "rebel", "outspoken", "political",
];

const AGE_GROUPS: &[&str] = &["under_18", "18_24", "25_34", "35_44", "45_plus"];

/// Compute all six compatibility factors for an athlete/brand pair.
///
/// Every sub-score is a pure function of its slice of the snapshot and
/// degrades to a documented default when optional fields are missing.
pub fn compute_factors(
    athlete: &AthleteProfile,
    brand: &BrandProfile,
    metrics: &[PlatformMetrics],
    rate_per_follower: f64,
) -> CompatibilityFactors {
    CompatibilityFactors {
        sport_alignment: sport_alignment(athlete, brand),
        audience_match: audience_match(athlete, brand, metrics),
        engagement_quality: engagement_quality(metrics),
        budget_compatibility: budget_compatibility(metrics, brand, rate_per_follower),
        location_proximity: location_proximity(athlete, brand),
        brand_safety: brand_safety(athlete, metrics),
    }
}

/// Sport-brand alignment.
///
/// 100 on a preferred-sports hit (an empty list means the brand has no
/// preference), otherwise the industry affinity table, then the generic
/// sport-industry table at 75, floor 30.
pub fn sport_alignment(athlete: &AthleteProfile, brand: &BrandProfile) -> f64 {
    let sport = athlete.sport.to_lowercase();

    if brand.preferred_sports.is_empty()
        || brand
            .preferred_sports
            .iter()
            .any(|s| s.to_lowercase() == sport)
    {
        return 100.0;
    }

    let industry = brand.industry.to_lowercase();

    if let Some((_, row)) = INDUSTRY_SPORT_AFFINITY
        .iter()
        .find(|(name, _)| *name == industry)
    {
        return row
            .iter()
            .find(|(name, _)| *name == sport)
            .map(|(_, score)| *score)
            .unwrap_or(AFFINITY_ROW_DEFAULT);
    }

    if let Some((_, industries)) = SPORT_COMPATIBLE_INDUSTRIES
        .iter()
        .find(|(name, _)| *name == sport)
    {
        if !industry.is_empty() && industries.contains(&industry.as_str()) {
            return 75.0;
        }
    }

    30.0
}

fn age_group_for(age: u8) -> &'static str {
    match age {
        0..=18 => "under_18",
        19..=24 => "18_24",
        25..=34 => "25_34",
        35..=44 => "35_44",
        _ => "45_plus",
    }
}

fn age_group_distance(a: &str, b: &str) -> usize {
    let pos_a = AGE_GROUPS.iter().position(|g| *g == a);
    let pos_b = AGE_GROUPS.iter().position(|g| *g == b);
    match (pos_a, pos_b) {
        (Some(a), Some(b)) => a.abs_diff(b),
        // Unknown group labels count as a moderate distance
        _ => 2,
    }
}

/// Follower-count influence tier used for income compatibility
fn influence_tier(followers: u64) -> &'static str {
    if followers >= 1_000_000 {
        "high"
    } else if followers >= 100_000 {
        "medium"
    } else if followers >= 10_000 {
        "low_medium"
    } else {
        "low"
    }
}

/// Audience/demographics alignment.
///
/// Weighted blend of age group (0.30), gender (0.20), interests (0.25) and
/// income tier (0.25). A dimension only counts when the brand targets it;
/// with no targeting at all the score is a flat 70.
pub fn audience_match(
    athlete: &AthleteProfile,
    brand: &BrandProfile,
    metrics: &[PlatformMetrics],
) -> f64 {
    let target = match &brand.target_demographics {
        Some(t) if !t.is_empty() => t,
        _ => return 70.0,
    };

    let mut score = 0.0;
    let mut total_weight = 0.0;

    if let (Some(target_age), Some(age)) = (&target.age_group, athlete.age) {
        let group = age_group_for(age);
        let points = if group == target_age {
            100.0
        } else if age_group_distance(group, target_age) == 1 {
            70.0
        } else {
            30.0
        };
        score += points * 0.30;
        total_weight += 0.30;
    }

    if let Some(target_gender) = &target.gender {
        let target_gender = target_gender.to_lowercase();
        let athlete_gender = athlete
            .gender
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        let points = if target_gender == "any" || athlete_gender == target_gender {
            100.0
        } else {
            40.0
        };
        score += points * 0.20;
        total_weight += 0.20;
    }

    if !target.interests.is_empty() {
        let sport = athlete.sport.to_lowercase();
        let bio = athlete.bio.to_lowercase();
        let hits = target
            .interests
            .iter()
            .filter(|interest| {
                let interest = interest.to_lowercase();
                sport.contains(&interest) || bio.contains(&interest)
            })
            .count();
        let points = hits as f64 / target.interests.len() as f64 * 100.0;
        score += points * 0.25;
        total_weight += 0.25;
    }

    if let Some(income) = &target.income_level {
        if !metrics.is_empty() {
            let tier = influence_tier(total_followers(metrics));
            let compatible = matches!(
                (income.to_lowercase().as_str(), tier),
                ("low", "low" | "low_medium")
                    | ("medium", "low_medium" | "medium")
                    | ("high", "medium" | "high")
            );
            let points = if compatible {
                90.0
            } else if tier == "high" {
                // High influence appeals across income levels
                75.0
            } else {
                50.0
            };
            score += points * 0.25;
            total_weight += 0.25;
        }
    }

    if total_weight > 0.0 {
        (score / total_weight).clamp(0.0, 100.0)
    } else {
        70.0
    }
}

/// Engagement quality as a step function of mean engagement rate
pub fn engagement_quality(metrics: &[PlatformMetrics]) -> f64 {
    if metrics.is_empty() {
        return 30.0;
    }

    let avg = mean_engagement(metrics);
    if avg >= 10.0 {
        100.0
    } else if avg >= 7.0 {
        90.0
    } else if avg >= 5.0 {
        75.0
    } else if avg >= 3.0 {
        60.0
    } else if avg >= 1.0 {
        40.0
    } else {
        20.0
    }
}

/// Estimated market rate for an athlete, in dollars
pub fn estimate_athlete_rate(followers: u64, engagement: f64, rate_per_follower: f64) -> f64 {
    followers as f64 * rate_per_follower * (1.0 + engagement / 10.0)
}

/// Budget fit between the athlete's estimated rate and the brand's range.
///
/// Under-priced athletes score near-full (95), in-range is a perfect 100,
/// then 70/40/15 bands at 1.2x and 1.5x over the maximum.
pub fn budget_compatibility(
    metrics: &[PlatformMetrics],
    brand: &BrandProfile,
    rate_per_follower: f64,
) -> f64 {
    if metrics.is_empty() {
        return 50.0;
    }

    let estimated_rate = estimate_athlete_rate(
        total_followers(metrics),
        mean_engagement(metrics),
        rate_per_follower,
    );

    if brand.budget_max <= 0.0 {
        return 60.0;
    }

    if estimated_rate <= brand.budget_min {
        95.0
    } else if estimated_rate <= brand.budget_max {
        100.0
    } else if estimated_rate <= brand.budget_max * 1.2 {
        70.0
    } else if estimated_rate <= brand.budget_max * 1.5 {
        40.0
    } else {
        15.0
    }
}

/// Geographic proximity from normalized location strings.
///
/// Exact match 100, same trailing state token 80, any shared segment 60,
/// otherwise 30. Missing location on either side scores a neutral 50.
pub fn location_proximity(athlete: &AthleteProfile, brand: &BrandProfile) -> f64 {
    let athlete_location = athlete.location.trim().to_lowercase();
    let brand_location = brand.location.trim().to_lowercase();

    if athlete_location.is_empty() || brand_location.is_empty() {
        return 50.0;
    }

    if athlete_location == brand_location {
        return 100.0;
    }

    let athlete_parts: Vec<&str> = athlete_location.split(',').map(str::trim).collect();
    let brand_parts: Vec<&str> = brand_location.split(',').map(str::trim).collect();

    // "City, State" format: compare the trailing state token
    if athlete_parts.len() >= 2 && brand_parts.len() >= 2 {
        if athlete_parts.last() == brand_parts.last() {
            return 80.0;
        }
    }

    if athlete_parts
        .iter()
        .any(|part| !part.is_empty() && brand_location.contains(part))
    {
        return 60.0;
    }

    30.0
}

/// Brand safety estimate.
///
/// Starts from 100 and applies keyword penalties, engagement-pattern
/// anomalies, platform spread and profile completeness adjustments. Clamped
/// to [20, 100] so one bad signal never zeroes an athlete out.
pub fn brand_safety(athlete: &AthleteProfile, metrics: &[PlatformMetrics]) -> f64 {
    let mut score = 100.0;

    let bio = athlete.bio.to_lowercase();
    let red_flags = RED_FLAG_KEYWORDS
        .iter()
        .filter(|keyword| bio.contains(*keyword))
        .count();
    let moderate_risks = MODERATE_RISK_KEYWORDS
        .iter()
        .filter(|keyword| bio.contains(*keyword))
        .count();

    score -= red_flags as f64 * 25.0;
    score -= moderate_risks as f64 * 10.0;

    if !metrics.is_empty() {
        let avg_engagement = mean_engagement(metrics);
        let followers = total_followers(metrics);

        // Very high engagement on a tiny following suggests bought engagement
        if avg_engagement > 15.0 && followers < 10_000 {
            score -= 15.0;
        }
        // Near-zero engagement on a large following suggests a stale account
        if avg_engagement < 1.0 && followers > 50_000 {
            score -= 10.0;
        }

        match metrics.len() {
            n if n >= 3 => score += 10.0,
            1 => score -= 5.0,
            _ => {}
        }
    }

    if athlete.verified {
        score += 5.0;
    }

    let required_fields = [
        &athlete.first_name,
        &athlete.last_name,
        &athlete.sport,
        &athlete.school,
        &athlete.bio,
    ];
    let completed = required_fields.iter().filter(|f| !f.is_empty()).count();
    let completeness = completed as f64 / required_fields.len() as f64 * 100.0;

    if completeness >= 80.0 {
        score += 5.0;
    } else if completeness < 60.0 {
        score -= 15.0;
    }

    score.clamp(20.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TargetDemographics;

    fn athlete(sport: &str) -> AthleteProfile {
        AthleteProfile {
            id: "ath_1".to_string(),
            first_name: "Jordan".to_string(),
            last_name: "Lee".to_string(),
            sport: sport.to_string(),
            school: "State".to_string(),
            bio: "Student athlete".to_string(),
            ..AthleteProfile::default()
        }
    }

    fn brand_preferring(sports: &[&str]) -> BrandProfile {
        BrandProfile {
            id: "brd_1".to_string(),
            company_name: "Acme".to_string(),
            preferred_sports: sports.iter().map(|s| s.to_string()).collect(),
            ..BrandProfile::default()
        }
    }

    fn metrics(followers: u64, engagement: f64) -> Vec<PlatformMetrics> {
        vec![PlatformMetrics {
            platform: "instagram".to_string(),
            followers,
            engagement_rate: engagement,
            content_categories: vec![],
        }]
    }

    #[test]
    fn test_sport_alignment_preferred_hit() {
        let score = sport_alignment(&athlete("basketball"), &brand_preferring(&["basketball"]));
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_sport_alignment_no_preference_means_open() {
        let score = sport_alignment(&athlete("curling"), &brand_preferring(&[]));
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_sport_alignment_mismatch_without_industry() {
        let score = sport_alignment(&athlete("golf"), &brand_preferring(&["basketball"]));
        assert!(score <= 40.0);
    }

    #[test]
    fn test_sport_alignment_industry_affinity() {
        let mut brand = brand_preferring(&["basketball"]);
        brand.industry = "fitness".to_string();
        assert_eq!(sport_alignment(&athlete("swimming"), &brand), 100.0);
        // Sport absent from the fitness row falls to the row default
        assert_eq!(sport_alignment(&athlete("golf"), &brand), 40.0);
    }

    #[test]
    fn test_sport_alignment_generic_industry_match() {
        let mut brand = brand_preferring(&["basketball"]);
        brand.industry = "luxury".to_string();
        assert_eq!(sport_alignment(&athlete("golf"), &brand), 75.0);
    }

    #[test]
    fn test_engagement_quality_bands() {
        assert_eq!(engagement_quality(&metrics(1000, 12.0)), 100.0);
        assert_eq!(engagement_quality(&metrics(1000, 7.5)), 90.0);
        assert_eq!(engagement_quality(&metrics(1000, 5.0)), 75.0);
        assert_eq!(engagement_quality(&metrics(1000, 3.5)), 60.0);
        assert_eq!(engagement_quality(&metrics(1000, 1.0)), 40.0);
        assert_eq!(engagement_quality(&metrics(1000, 0.2)), 20.0);
        assert_eq!(engagement_quality(&[]), 30.0);
    }

    #[test]
    fn test_rate_estimation() {
        // 100k followers at 5% engagement with $0.01/follower
        let rate = estimate_athlete_rate(100_000, 5.0, 0.01);
        assert!((rate - 1_500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_budget_bands() {
        let m = metrics(100_000, 5.0); // estimated rate 1500 at 0.01

        let mut brand = BrandProfile {
            budget_min: 1_000.0,
            budget_max: 2_000.0,
            ..BrandProfile::default()
        };
        assert_eq!(budget_compatibility(&m, &brand, 0.01), 100.0);

        brand.budget_max = 1_000.0;
        // 1500 = 1.5x the max, past the 1.2x band
        assert_eq!(budget_compatibility(&m, &brand, 0.01), 40.0);

        brand.budget_min = 2_000.0;
        brand.budget_max = 5_000.0;
        assert_eq!(budget_compatibility(&m, &brand, 0.01), 95.0);

        brand.budget_max = 0.0;
        assert_eq!(budget_compatibility(&m, &brand, 0.01), 60.0);

        assert_eq!(budget_compatibility(&[], &brand, 0.01), 50.0);
    }

    #[test]
    fn test_location_bands() {
        let mut a = athlete("tennis");
        let mut b = brand_preferring(&[]);

        a.location = "Austin, TX".to_string();
        b.location = "Austin, TX".to_string();
        assert_eq!(location_proximity(&a, &b), 100.0);

        b.location = "Houston, TX".to_string();
        assert_eq!(location_proximity(&a, &b), 80.0);

        b.location = "Miami, FL".to_string();
        assert_eq!(location_proximity(&a, &b), 30.0);

        b.location = String::new();
        assert_eq!(location_proximity(&a, &b), 50.0);
    }

    #[test]
    fn test_brand_safety_red_flag_penalty() {
        let mut clean = athlete("tennis");
        clean.bio = "Team captain and honors student".to_string();
        let mut flagged = clean.clone();
        flagged.bio = "Team captain, recovering from an arrest last year".to_string();

        let m = metrics(50_000, 4.0);
        let clean_score = brand_safety(&clean, &m);
        let flagged_score = brand_safety(&flagged, &m);

        assert!((clean_score - flagged_score - 25.0).abs() < f64::EPSILON);
        assert!(flagged_score >= 20.0);
    }

    #[test]
    fn test_brand_safety_floor() {
        let mut risky = athlete("tennis");
        risky.bio =
            "controversial scandal arrest lawsuit drugs alcohol violence banned".to_string();
        let score = brand_safety(&risky, &metrics(5_000, 20.0));
        assert_eq!(score, 20.0);
    }

    #[test]
    fn test_brand_safety_platform_spread() {
        let a = athlete("tennis");
        let one = metrics(50_000, 4.0);
        let three = vec![
            PlatformMetrics {
                platform: "instagram".to_string(),
                followers: 20_000,
                engagement_rate: 4.0,
                content_categories: vec![],
            },
            PlatformMetrics {
                platform: "tiktok".to_string(),
                followers: 20_000,
                engagement_rate: 4.0,
                content_categories: vec![],
            },
            PlatformMetrics {
                platform: "youtube".to_string(),
                followers: 10_000,
                engagement_rate: 4.0,
                content_categories: vec![],
            },
        ];

        assert!(brand_safety(&a, &three) > brand_safety(&a, &one));
    }

    #[test]
    fn test_audience_match_defaults() {
        let a = athlete("tennis");
        let mut b = brand_preferring(&[]);
        assert_eq!(audience_match(&a, &b, &[]), 70.0);

        b.target_demographics = Some(TargetDemographics::default());
        assert_eq!(audience_match(&a, &b, &[]), 70.0);
    }

    #[test]
    fn test_audience_match_gender_and_interests() {
        let mut a = athlete("tennis");
        a.gender = Some("female".to_string());
        a.bio = "Tennis and fitness content creator".to_string();

        let mut b = brand_preferring(&[]);
        b.target_demographics = Some(TargetDemographics {
            gender: Some("female".to_string()),
            interests: vec!["tennis".to_string(), "fitness".to_string()],
            ..TargetDemographics::default()
        });

        // Both dimensions hit fully: (100*0.2 + 100*0.25) / 0.45 = 100
        let score = audience_match(&a, &b, &[]);
        assert!((score - 100.0).abs() < 1e-9);

        b.target_demographics = Some(TargetDemographics {
            gender: Some("male".to_string()),
            ..TargetDemographics::default()
        });
        assert_eq!(audience_match(&a, &b, &[]), 40.0);
    }

    #[test]
    fn test_audience_match_income_tiers() {
        let a = athlete("tennis");
        let mut b = brand_preferring(&[]);
        b.target_demographics = Some(TargetDemographics {
            income_level: Some("high".to_string()),
            ..TargetDemographics::default()
        });

        // 250k followers -> medium tier, compatible with "high" targeting
        assert_eq!(audience_match(&a, &b, &metrics(250_000, 3.0)), 90.0);
        // 5k followers -> low tier, incompatible
        assert_eq!(audience_match(&a, &b, &metrics(5_000, 3.0)), 50.0);
        // No metrics: dimension doesn't count, fall back to default
        assert_eq!(audience_match(&a, &b, &[]), 70.0);
    }

    #[test]
    fn test_all_factors_bounded_for_empty_profiles() {
        let a = AthleteProfile::default();
        let b = BrandProfile::default();
        let factors = compute_factors(&a, &b, &[], 0.01);

        for (_, value) in factors.named() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
