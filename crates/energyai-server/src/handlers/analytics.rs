//! Analytics handlers
//!
//! Each request pulls its own snapshot of recent predictions and computes
//! over it with the pure analytics functions; a user with no history gets a
//! well-formed zero/empty payload, never an error.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, AuthUser};
use energyai_core::analytics::{
    detect_anomalies, efficiency_score, emission_factor, estimate_carbon, generate_insights,
    generate_recommendations, Insight, Recommendation, BENCHMARK_KWH, DEFAULT_ANOMALY_SIGMA,
};
use energyai_core::models::PredictionRecord;
use energyai_core::weather::CurrentWeather;

/// How many recent predictions an analytics request looks at
const ANALYTICS_WINDOW: usize = 30;

/// Response for GET /api/analytics/insights
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<Insight>,
    pub efficiency_score: f64,
    pub anomaly_count: usize,
}

/// Response for GET /api/analytics/efficiency
#[derive(Debug, Serialize)]
pub struct EfficiencyResponse {
    pub efficiency_score: f64,
    pub average_consumption: f64,
    pub benchmark: f64,
    pub sample_size: usize,
}

/// Response for GET /api/analytics/recommendations
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

/// Query parameters for anomaly listing
#[derive(Debug, Deserialize)]
pub struct AnomalyQuery {
    /// Deviation multiple; defaults to 2 sigma
    pub sigma: Option<f64>,
}

/// Response for GET /api/analytics/anomalies
#[derive(Debug, Serialize)]
pub struct AnomaliesResponse {
    pub anomalies: Vec<PredictionRecord>,
    pub sigma: f64,
    pub sample_size: usize,
}

/// Query parameters for the carbon estimate
#[derive(Debug, Deserialize)]
pub struct CarbonQuery {
    pub consumption: f64,
    pub region: Option<String>,
}

/// Response for GET /api/analytics/carbon
#[derive(Debug, Serialize)]
pub struct CarbonResponse {
    pub consumption: f64,
    pub region: String,
    pub factor: f64,
    pub carbon_kg: f64,
}

async fn current_weather(state: &AppState) -> Option<CurrentWeather> {
    match &state.weather {
        Some(client) => Some(client.current().await),
        None => None,
    }
}

/// GET /api/analytics/insights - Insights over the user's recent predictions
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<InsightsResponse>, AppError> {
    let records = state
        .db
        .recent_predictions_for_user(claims.sub, ANALYTICS_WINDOW)?;
    let weather = current_weather(&state).await;

    let insights = generate_insights(&records, weather.as_ref());
    let efficiency = efficiency_score(&records);
    let anomaly_count = detect_anomalies(&records, DEFAULT_ANOMALY_SIGMA).len();

    Ok(Json(InsightsResponse {
        insights,
        efficiency_score: efficiency,
        anomaly_count,
    }))
}

/// GET /api/analytics/efficiency - Efficiency score with its inputs
pub async fn get_efficiency(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<EfficiencyResponse>, AppError> {
    let records = state
        .db
        .recent_predictions_for_user(claims.sub, ANALYTICS_WINDOW)?;

    let average_consumption = if records.is_empty() {
        0.0
    } else {
        records
            .iter()
            .map(|r| r.predicted_consumption)
            .sum::<f64>()
            / records.len() as f64
    };

    Ok(Json(EfficiencyResponse {
        efficiency_score: efficiency_score(&records),
        average_consumption,
        benchmark: BENCHMARK_KWH,
        sample_size: records.len(),
    }))
}

/// GET /api/analytics/recommendations - Savings recommendations
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let records = state
        .db
        .recent_predictions_for_user(claims.sub, ANALYTICS_WINDOW)?;
    let weather = current_weather(&state).await;

    Ok(Json(RecommendationsResponse {
        recommendations: generate_recommendations(&records, weather.as_ref()),
    }))
}

/// GET /api/analytics/anomalies - Anomalous predictions in the recent window
pub async fn get_anomalies(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(params): Query<AnomalyQuery>,
) -> Result<Json<AnomaliesResponse>, AppError> {
    let sigma = params.sigma.unwrap_or(DEFAULT_ANOMALY_SIGMA);
    if sigma <= 0.0 {
        return Err(AppError::bad_request("sigma must be positive"));
    }

    let records = state
        .db
        .recent_predictions_for_user(claims.sub, ANALYTICS_WINDOW)?;

    let anomalies = detect_anomalies(&records, sigma)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(AnomaliesResponse {
        anomalies,
        sigma,
        sample_size: records.len(),
    }))
}

/// GET /api/analytics/carbon - Carbon estimate for a consumption figure
pub async fn get_carbon(
    AuthUser(_claims): AuthUser,
    Query(params): Query<CarbonQuery>,
) -> Result<Json<CarbonResponse>, AppError> {
    if params.consumption < 0.0 {
        return Err(AppError::bad_request("consumption must be non-negative"));
    }

    let region = params.region.unwrap_or_else(|| "US".to_string());

    Ok(Json(CarbonResponse {
        consumption: params.consumption,
        factor: emission_factor(&region),
        carbon_kg: estimate_carbon(params.consumption, &region),
        region,
    }))
}
