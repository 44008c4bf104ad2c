//! Weather handlers
//!
//! Public endpoints; the dashboard shows weather before login. When no
//! collaborator is configured or it is unreachable, the fixed fallback
//! reading is served so the UI always has something to render.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use energyai_core::weather::{CurrentWeather, ForecastEntry};

/// Longest forecast the upstream free tier answers
const MAX_FORECAST_DAYS: usize = 5;

/// Query parameters for the forecast
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub days: Option<usize>,
}

/// Response for GET /api/weather/forecast
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub days: usize,
    pub entries: Vec<ForecastEntry>,
}

/// GET /api/weather/current - Current conditions
pub async fn get_current_weather(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CurrentWeather>, AppError> {
    let weather = match &state.weather {
        Some(client) => client.current().await,
        None => CurrentWeather::fallback(),
    };

    Ok(Json(weather))
}

/// GET /api/weather/forecast - Upcoming 3-hourly entries
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, AppError> {
    let days = params.days.unwrap_or(MAX_FORECAST_DAYS).clamp(1, MAX_FORECAST_DAYS);

    let entries = match &state.weather {
        Some(client) => client.forecast(days).await,
        None => Vec::new(),
    };

    Ok(Json(ForecastResponse { days, entries }))
}
