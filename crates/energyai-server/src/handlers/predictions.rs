//! Prediction submission and listing handlers
//!
//! Storing a prediction is the trigger point for threshold alerting: after
//! the row is written, the user's thresholds are evaluated synchronously and
//! any resulting emails are dispatched on a spawned task (at-most-once,
//! best-effort, no retry).

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{AppError, AppState, AuthUser, Claims, MaybeUser, MAX_PAGE_LIMIT};
use energyai_core::alerts::{check_thresholds, PredictionSnapshot};
use energyai_core::analytics::estimate_carbon;
use energyai_core::models::{DeviceUsage, NewPrediction, PredictionRecord, Season};
use energyai_core::prediction::{ModelPredictions, PredictionInput};

/// Request body for storing an externally produced prediction
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePredictionRequest {
    pub temperature: f64,
    pub household_size: i64,
    pub season: Season,
    pub date: NaiveDate,
    #[serde(default)]
    pub devices: Vec<DeviceUsage>,
    pub predicted_consumption: f64,
    pub model_used: String,
    pub confidence: f64,
    /// Estimated cost; 0 when absent
    #[serde(default)]
    pub cost: Option<f64>,
    /// Grid region for the carbon estimate; US factor when absent
    #[serde(default)]
    pub region: Option<String>,
}

/// Request body for a proxied prediction
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub temperature: f64,
    pub household_size: i64,
    pub season: Season,
    pub date: NaiveDate,
    #[serde(default)]
    pub devices: Vec<DeviceUsage>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Response for a stored prediction
#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub id: i64,
    pub carbon_footprint: f64,
    pub message: &'static str,
}

/// Response for a proxied prediction
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub id: i64,
    pub predicted_consumption: f64,
    pub model_used: String,
    pub confidence: f64,
    pub carbon_footprint: f64,
    /// All per-model figures, for the comparison chart
    pub models: ModelPredictions,
}

/// Query parameters for listing predictions
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// POST /api/predictions - Store a prediction produced elsewhere
///
/// Works without a token; anonymous submissions are stored unattributed and
/// never alert.
pub async fn store_prediction(
    State(state): State<Arc<AppState>>,
    MaybeUser(claims): MaybeUser,
    Json(body): Json<StorePredictionRequest>,
) -> Result<Json<StoreResponse>, AppError> {
    let cost = body.cost.unwrap_or(0.0);
    let region = body.region.as_deref().unwrap_or("US");
    let carbon_footprint = estimate_carbon(body.predicted_consumption, region);

    let new = NewPrediction {
        user_id: claims.as_ref().map(|c| c.sub),
        temperature: body.temperature,
        household_size: body.household_size,
        season: body.season,
        date: body.date,
        devices: body.devices,
        predicted_consumption: body.predicted_consumption,
        model_used: body.model_used,
        confidence: body.confidence,
        cost,
        carbon_footprint,
    };

    let id = state.db.insert_prediction(&new)?;
    info!(id, user_id = ?new.user_id, "Prediction stored");

    if let Some(claims) = claims {
        trigger_alerts(&state, &claims, new.predicted_consumption, cost)?;
    }

    Ok(Json(StoreResponse {
        id,
        carbon_footprint,
        message: "Prediction stored successfully",
    }))
}

/// POST /api/predict - Ask the ML collaborator for a figure, then store it
pub async fn predict(
    State(state): State<Arc<AppState>>,
    MaybeUser(claims): MaybeUser,
    Json(body): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let Some(predictor) = &state.predictor else {
        return Err(AppError::service_unavailable(
            "Prediction service not configured",
        ));
    };

    let input = PredictionInput {
        temperature: body.temperature,
        household_size: body.household_size,
        season: body.season,
        date: body.date,
        devices: body.devices.clone(),
    };

    let models = predictor.predict(&input).await?;
    let best = models.best();

    let cost = body.cost.unwrap_or(0.0);
    let region = body.region.as_deref().unwrap_or("US");
    let carbon_footprint = estimate_carbon(best.consumption, region);

    let new = NewPrediction {
        user_id: claims.as_ref().map(|c| c.sub),
        temperature: body.temperature,
        household_size: body.household_size,
        season: body.season,
        date: body.date,
        devices: body.devices,
        predicted_consumption: best.consumption,
        model_used: best.model.clone(),
        confidence: best.confidence,
        cost,
        carbon_footprint,
    };

    let id = state.db.insert_prediction(&new)?;
    info!(id, model = %best.model, "Prediction fetched and stored");

    if let Some(claims) = claims {
        trigger_alerts(&state, &claims, best.consumption, cost)?;
    }

    Ok(Json(PredictResponse {
        id,
        predicted_consumption: best.consumption,
        model_used: best.model,
        confidence: best.confidence,
        carbon_footprint,
        models,
    }))
}

/// GET /api/predictions - List the current user's recent predictions
pub async fn list_predictions(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<PredictionRecord>>, AppError> {
    let limit = params.limit.unwrap_or(10).min(MAX_PAGE_LIMIT);
    let records = state.db.recent_predictions_for_user(claims.sub, limit)?;
    Ok(Json(records))
}

/// Evaluate thresholds for a freshly stored prediction and fire off emails
///
/// The evaluation itself is synchronous and cheap; only delivery is pushed
/// onto a task so a slow mail relay cannot hold the response.
fn trigger_alerts(
    state: &Arc<AppState>,
    claims: &Claims,
    consumption: f64,
    cost: f64,
) -> Result<(), AppError> {
    let settings = state.db.get_user_settings(claims.sub)?;

    let snapshot = PredictionSnapshot { consumption, cost };
    let intents = check_thresholds(&snapshot, &settings);

    if intents.is_empty() {
        return Ok(());
    }

    if !settings.email_alerts_enabled {
        debug!(user_id = claims.sub, "Alerts triggered but emails disabled");
        return Ok(());
    }

    let Some(dispatcher) = state.dispatcher.clone() else {
        debug!(user_id = claims.sub, "Alerts triggered but no mail transport");
        return Ok(());
    };

    let email = claims.email.clone();
    info!(
        user_id = claims.sub,
        count = intents.len(),
        "Dispatching alert emails"
    );

    // Fire-and-forget: at-most-once, best-effort, no retry
    tokio::spawn(async move {
        dispatcher.dispatch_all(&email, &intents).await;
    });

    Ok(())
}
