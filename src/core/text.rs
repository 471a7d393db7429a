use crate::models::{
    distinct_categories, mean_engagement, total_followers, AthleteProfile, BrandProfile,
    PlatformMetrics,
};
use num_format::{Locale, ToFormattedString};

/// Format a dollar amount with thousands separators, e.g. `$12,500`
pub fn format_currency(amount: f64) -> String {
    let whole = amount.round().max(0.0) as u64;
    format!("${}", whole.to_formatted_string(&Locale::en))
}

/// Render an athlete record into the text fed to the embedding model.
///
/// Fields are emitted in a fixed order and empty fields are omitted, so the
/// output is a deterministic function of the input.
pub fn render_athlete_profile(athlete: &AthleteProfile, metrics: &[PlatformMetrics]) -> String {
    let mut segments: Vec<String> = Vec::new();

    if !athlete.sport.is_empty() {
        segments.push(format!("Sport: {}", athlete.sport));
    }
    if !athlete.school.is_empty() {
        segments.push(format!("School: {}", athlete.school));
    }
    if !athlete.location.is_empty() {
        segments.push(format!("Location: {}", athlete.location));
    }
    if !athlete.bio.is_empty() {
        segments.push(format!("Biography: {}", athlete.bio));
    }

    if !metrics.is_empty() {
        let followers = total_followers(metrics);
        let engagement = mean_engagement(metrics);
        let platforms: Vec<&str> = metrics.iter().map(|m| m.platform.as_str()).collect();

        segments.push(format!("Social media reach: {} total followers", followers));
        segments.push(format!("Engagement rate: {:.1}%", engagement));
        segments.push(format!("Active platforms: {}", platforms.join(", ")));

        let categories = distinct_categories(metrics);
        if !categories.is_empty() {
            segments.push(format!("Content focus: {}", categories.join(", ")));
        }
    }

    segments.join(" | ")
}

/// Render a brand record into the text fed to the embedding model
pub fn render_brand_profile(brand: &BrandProfile) -> String {
    let mut segments: Vec<String> = Vec::new();

    if !brand.company_name.is_empty() {
        segments.push(format!("Company: {}", brand.company_name));
    }
    if !brand.industry.is_empty() {
        segments.push(format!("Industry: {}", brand.industry));
    }
    if !brand.description.is_empty() {
        segments.push(format!("Description: {}", brand.description));
    }
    if !brand.location.is_empty() {
        segments.push(format!("Location: {}", brand.location));
    }

    if !brand.preferred_sports.is_empty() {
        segments.push(format!("Target sports: {}", brand.preferred_sports.join(", ")));
    }

    if let Some(demographics) = &brand.target_demographics {
        let mut demo_text: Vec<String> = Vec::new();
        if let Some(age_group) = &demographics.age_group {
            demo_text.push(format!("Primary age group: {}", age_group));
        }
        if let Some(gender) = &demographics.gender {
            demo_text.push(format!("Primary gender: {}", gender));
        }
        if !demo_text.is_empty() {
            segments.push(format!("Target demographics: {}", demo_text.join(", ")));
        }
    }

    if brand.budget_max > 0.0 {
        segments.push(format!(
            "Budget range: {} - {}",
            format_currency(brand.budget_min),
            format_currency(brand.budget_max)
        ));
    }

    segments.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TargetDemographics;

    fn sample_athlete() -> AthleteProfile {
        AthleteProfile {
            id: "ath_1".to_string(),
            first_name: "Jordan".to_string(),
            last_name: "Lee".to_string(),
            sport: "tennis".to_string(),
            school: "Stanford".to_string(),
            location: "Palo Alto, CA".to_string(),
            bio: "Competitive tennis player".to_string(),
            ..AthleteProfile::default()
        }
    }

    #[test]
    fn test_athlete_rendering_is_deterministic() {
        let athlete = sample_athlete();
        let metrics = vec![PlatformMetrics {
            platform: "instagram".to_string(),
            followers: 25_000,
            engagement_rate: 6.5,
            content_categories: vec!["tennis".to_string()],
        }];

        let first = render_athlete_profile(&athlete, &metrics);
        let second = render_athlete_profile(&athlete, &metrics);
        assert_eq!(first, second);

        assert!(first.contains("Sport: tennis"));
        assert!(first.contains("Social media reach: 25000 total followers"));
        assert!(first.contains("Engagement rate: 6.5%"));
        assert!(first.contains("Content focus: tennis"));
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let athlete = AthleteProfile::default();
        let rendered = render_athlete_profile(&athlete, &[]);
        assert!(rendered.is_empty());

        let athlete = AthleteProfile {
            sport: "golf".to_string(),
            ..AthleteProfile::default()
        };
        let rendered = render_athlete_profile(&athlete, &[]);
        assert_eq!(rendered, "Sport: golf");
    }

    #[test]
    fn test_brand_rendering() {
        let brand = BrandProfile {
            company_name: "Peak Nutrition".to_string(),
            industry: "nutrition".to_string(),
            location: "Austin, TX".to_string(),
            preferred_sports: vec!["tennis".to_string(), "track".to_string()],
            target_demographics: Some(TargetDemographics {
                age_group: Some("18_24".to_string()),
                gender: Some("any".to_string()),
                ..TargetDemographics::default()
            }),
            budget_min: 1_000.0,
            budget_max: 5_000.0,
            ..BrandProfile::default()
        };

        let rendered = render_brand_profile(&brand);
        assert!(rendered.contains("Company: Peak Nutrition"));
        assert!(rendered.contains("Target sports: tennis, track"));
        assert!(rendered.contains("Primary age group: 18_24"));
        assert!(rendered.contains("Budget range: $1,000 - $5,000"));
        // Empty description segment is not emitted
        assert!(!rendered.contains("Description:"));
    }

    #[test]
    fn test_currency_formatting() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(1_500.4), "$1,500");
        assert_eq!(format_currency(1_250_000.0), "$1,250,000");
    }
}
