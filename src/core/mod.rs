// Core algorithm exports
pub mod factors;
pub mod matcher;
pub mod scoring;
pub mod text;

pub use factors::{compute_factors, estimate_athlete_rate};
pub use matcher::{rank_matches, MatcherConfig, MatchingService};
pub use scoring::{
    aggregate_score, assess_risk_factors, estimated_success_rate, generate_recommendation,
    optimization_suggestions,
};
pub use text::{render_athlete_profile, render_brand_profile};
