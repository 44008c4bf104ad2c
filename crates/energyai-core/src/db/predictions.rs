//! Stored prediction operations

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{NewPrediction, PredictionRecord, Season};

impl Database {
    /// Insert a prediction, returning its id
    pub fn insert_prediction(&self, prediction: &NewPrediction) -> Result<i64> {
        let conn = self.conn()?;

        let devices_json = serde_json::to_string(&prediction.devices)?;

        conn.execute(
            r#"
            INSERT INTO predictions (
                user_id, temperature, household_size, season, date, devices,
                predicted_consumption, model_used, confidence, cost, carbon_footprint
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                prediction.user_id,
                prediction.temperature,
                prediction.household_size,
                prediction.season.as_str(),
                prediction.date.format("%Y-%m-%d").to_string(),
                devices_json,
                prediction.predicted_consumption,
                prediction.model_used,
                prediction.confidence,
                prediction.cost,
                prediction.carbon_footprint,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Most recent predictions for a user, newest first
    pub fn recent_predictions_for_user(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<PredictionRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, temperature, household_size, season, date, devices,
                   predicted_consumption, model_used, confidence, cost, carbon_footprint,
                   created_at
            FROM predictions
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )?;

        let records = stmt
            .query_map(params![user_id, limit as i64], row_to_prediction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Most recent predictions across all users, newest first
    pub fn recent_predictions(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, temperature, household_size, season, date, devices,
                   predicted_consumption, model_used, confidence, cost, carbon_footprint,
                   created_at
            FROM predictions
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )?;

        let records = stmt
            .query_map(params![limit as i64], row_to_prediction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Count stored predictions
    pub fn count_predictions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM predictions", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_prediction(row: &Row<'_>) -> rusqlite::Result<PredictionRecord> {
    let season_str: String = row.get(4)?;
    let date_str: String = row.get(5)?;
    let devices_json: String = row.get(6)?;
    let created_at_str: String = row.get(12)?;

    Ok(PredictionRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        temperature: row.get(2)?,
        household_size: row.get(3)?,
        season: season_str.parse().unwrap_or(Season::Summer),
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| chrono::Utc::now().date_naive()),
        devices: serde_json::from_str(&devices_json).unwrap_or_default(),
        predicted_consumption: row.get(7)?,
        model_used: row.get(8)?,
        confidence: row.get(9)?,
        cost: row.get(10)?,
        carbon_footprint: row.get(11)?,
        created_at: parse_datetime(&created_at_str),
    })
}
