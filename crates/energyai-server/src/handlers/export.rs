//! CSV export handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser, MAX_EXPORT_LIMIT};
use energyai_core::export::predictions_to_csv;

/// Query parameters for the export
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub limit: Option<usize>,
}

/// GET /api/export/csv - Download the user's predictions as CSV
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(params): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let limit = params.limit.unwrap_or(1000).min(MAX_EXPORT_LIMIT);

    let records = state.db.recent_predictions_for_user(claims.sub, limit)?;
    let csv = predictions_to_csv(&records)?;

    let response = (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"predictions.csv\"",
            ),
        ],
        csv,
    )
        .into_response();

    Ok(response)
}
