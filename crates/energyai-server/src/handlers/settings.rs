//! Alert threshold settings handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState, AuthUser};
use energyai_core::models::UserSettings;

/// Request body for updating settings (full replacement)
#[derive(Debug, Deserialize)]
pub struct SettingsUpdateRequest {
    pub high_consumption_threshold: f64,
    pub cost_threshold: f64,
    pub normal_consumption: f64,
    pub email_alerts_enabled: bool,
}

/// GET /api/settings - Current user's thresholds, defaults when never saved
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserSettings>, AppError> {
    let settings = state.db.get_user_settings(claims.sub)?;
    Ok(Json(settings))
}

/// PUT /api/settings - Replace the current user's thresholds
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(body): Json<SettingsUpdateRequest>,
) -> Result<Json<UserSettings>, AppError> {
    if body.high_consumption_threshold <= 0.0
        || body.cost_threshold <= 0.0
        || body.normal_consumption <= 0.0
    {
        return Err(AppError::bad_request("Thresholds must be positive"));
    }

    let settings = UserSettings {
        user_id: claims.sub,
        high_consumption_threshold: body.high_consumption_threshold,
        cost_threshold: body.cost_threshold,
        normal_consumption: body.normal_consumption,
        email_alerts_enabled: body.email_alerts_enabled,
    };

    state.db.upsert_user_settings(&settings)?;
    info!(user_id = claims.sub, "Settings updated");

    Ok(Json(settings))
}
