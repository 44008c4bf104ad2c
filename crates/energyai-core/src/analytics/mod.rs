//! Consumption analytics
//!
//! Pure functions over a snapshot of stored predictions. Each request fetches
//! its own snapshot from the database and computes over it; nothing here
//! holds state or performs I/O.
//!
//! - `stats` - efficiency score and anomaly detection
//! - `insights` - display insights derived from stats and current weather
//! - `recommendations` - savings recommendations
//! - `carbon` - regional emission estimation

pub mod carbon;
pub mod insights;
pub mod recommendations;
pub mod stats;

pub use carbon::{emission_factor, estimate_carbon, DEFAULT_EMISSION_FACTOR};
pub use insights::{generate_insights, Insight, InsightKind, Priority};
pub use recommendations::{generate_recommendations, Impact, Recommendation};
pub use stats::{
    detect_anomalies, efficiency_score, BENCHMARK_KWH, DEFAULT_ANOMALY_SIGMA, MIN_ANOMALY_SAMPLES,
};
