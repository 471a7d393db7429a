// Criterion benchmarks for NILMatch scoring

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nilmatch::core::{aggregate_score, compute_factors, rank_matches, render_athlete_profile};
use nilmatch::models::{
    AthleteProfile, BrandProfile, CompatibilityFactors, MatchResult, PlatformMetrics,
    ScoringWeights, TargetDemographics,
};

const SPORTS: &[&str] = &[
    "basketball", "football", "tennis", "swimming", "golf", "baseball", "track", "soccer",
];

fn create_athlete(id: usize) -> AthleteProfile {
    AthleteProfile {
        id: format!("ath_{}", id),
        first_name: "Athlete".to_string(),
        last_name: id.to_string(),
        sport: SPORTS[id % SPORTS.len()].to_string(),
        school: "State University".to_string(),
        location: if id % 2 == 0 {
            "Austin, TX".to_string()
        } else {
            "Miami, FL".to_string()
        },
        bio: "Student athlete focused on community work and competition".to_string(),
        age: Some(18 + (id % 10) as u8),
        gender: Some(if id % 2 == 0 { "female" } else { "male" }.to_string()),
        verified: id % 3 == 0,
        ..AthleteProfile::default()
    }
}

fn create_metrics(id: usize) -> Vec<PlatformMetrics> {
    vec![
        PlatformMetrics {
            platform: "instagram".to_string(),
            followers: 1_000 * (1 + (id % 200)) as u64,
            engagement_rate: (id % 12) as f64,
            content_categories: vec!["sports".to_string(), "lifestyle".to_string()],
        },
        PlatformMetrics {
            platform: "tiktok".to_string(),
            followers: 500 * (1 + (id % 150)) as u64,
            engagement_rate: (id % 9) as f64,
            content_categories: vec!["sports".to_string()],
        },
    ]
}

fn create_brand() -> BrandProfile {
    BrandProfile {
        id: "brd_bench".to_string(),
        company_name: "Benchmark Apparel".to_string(),
        industry: "sports_apparel".to_string(),
        location: "Austin, TX".to_string(),
        preferred_sports: vec!["tennis".to_string(), "basketball".to_string()],
        target_demographics: Some(TargetDemographics {
            age_group: Some("18_24".to_string()),
            gender: Some("any".to_string()),
            interests: vec!["sports".to_string(), "fitness".to_string()],
            income_level: Some("medium".to_string()),
        }),
        budget_min: 500.0,
        budget_max: 10_000.0,
        ..BrandProfile::default()
    }
}

fn bench_compute_factors(c: &mut Criterion) {
    let athlete = create_athlete(7);
    let brand = create_brand();
    let metrics = create_metrics(7);

    c.bench_function("compute_factors", |b| {
        b.iter(|| {
            compute_factors(
                black_box(&athlete),
                black_box(&brand),
                black_box(&metrics),
                0.01,
            )
        })
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let factors = CompatibilityFactors {
        sport_alignment: 90.0,
        audience_match: 70.0,
        engagement_quality: 75.0,
        budget_compatibility: 100.0,
        location_proximity: 80.0,
        brand_safety: 95.0,
    };
    let weights = ScoringWeights::default();

    c.bench_function("aggregate_score", |b| {
        b.iter(|| aggregate_score(black_box(&factors), black_box(0.62), &weights))
    });
}

fn bench_render_profile(c: &mut Criterion) {
    let athlete = create_athlete(3);
    let metrics = create_metrics(3);

    c.bench_function("render_athlete_profile", |b| {
        b.iter(|| render_athlete_profile(black_box(&athlete), black_box(&metrics)))
    });
}

fn bench_bulk_scoring(c: &mut Criterion) {
    let brand = create_brand();
    let weights = ScoringWeights::default();

    let mut group = c.benchmark_group("bulk_scoring");
    for count in [100usize, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let candidates: Vec<(AthleteProfile, Vec<PlatformMetrics>)> =
                (0..count).map(|i| (create_athlete(i), create_metrics(i))).collect();

            b.iter(|| {
                let results: Vec<MatchResult> = candidates
                    .iter()
                    .map(|(athlete, metrics)| {
                        let factors = compute_factors(athlete, &brand, metrics, 0.01);
                        let overall = aggregate_score(&factors, 0.5, &weights);
                        MatchResult {
                            counterpart_id: athlete.id.clone(),
                            counterpart_name: athlete.full_name(),
                            overall_score: overall,
                            semantic_similarity: 50.0,
                            factors,
                            recommendation: String::new(),
                            risk_factors: vec![],
                            optimization_suggestions: vec![],
                            estimated_rate: None,
                            total_followers: 0,
                        }
                    })
                    .collect();

                rank_matches(black_box(results), 70.0, 50)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_compute_factors,
    bench_aggregate,
    bench_render_profile,
    bench_bulk_scoring
);
criterion_main!(benches);
