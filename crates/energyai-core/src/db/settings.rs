//! Per-user alert threshold operations

use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::UserSettings;

impl Database {
    /// Get a user's alert settings, falling back to defaults when never saved
    pub fn get_user_settings(&self, user_id: i64) -> Result<UserSettings> {
        let conn = self.conn()?;
        let settings = conn
            .query_row(
                r#"
                SELECT user_id, high_consumption_threshold, cost_threshold,
                       normal_consumption, email_alerts_enabled
                FROM user_settings
                WHERE user_id = ?
                "#,
                params![user_id],
                |row| {
                    Ok(UserSettings {
                        user_id: row.get(0)?,
                        high_consumption_threshold: row.get(1)?,
                        cost_threshold: row.get(2)?,
                        normal_consumption: row.get(3)?,
                        email_alerts_enabled: row.get::<_, i64>(4)? != 0,
                    })
                },
            )
            .ok();

        Ok(settings.unwrap_or_else(|| UserSettings::defaults_for(user_id)))
    }

    /// Save a user's alert settings, replacing any existing row
    pub fn upsert_user_settings(&self, settings: &UserSettings) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO user_settings (
                user_id, high_consumption_threshold, cost_threshold,
                normal_consumption, email_alerts_enabled
            ) VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                high_consumption_threshold = excluded.high_consumption_threshold,
                cost_threshold = excluded.cost_threshold,
                normal_consumption = excluded.normal_consumption,
                email_alerts_enabled = excluded.email_alerts_enabled
            "#,
            params![
                settings.user_id,
                settings.high_consumption_threshold,
                settings.cost_threshold,
                settings.normal_consumption,
                settings.email_alerts_enabled as i64,
            ],
        )?;

        Ok(())
    }
}
