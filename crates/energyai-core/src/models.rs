//! Domain models for EnergyAI

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2 PHC string, never serialized to API responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Strip the password hash for API responses
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// User fields safe to return from the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Season a prediction was made for
///
/// The training dataset labels the wet season "Autumn/Rainy", so both
/// spellings parse to `Autumn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }
}

impl std::str::FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "autumn" | "rainy" | "autumn/rainy" => Ok(Self::Autumn),
            "winter" => Ok(Self::Winter),
            _ => Err(format!("Unknown season: {}", s)),
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Usage of a single device, in minutes per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceUsage {
    pub device: String,
    pub minutes: i64,
}

/// A stored consumption prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: i64,
    /// Owning user; None for anonymous submissions
    pub user_id: Option<i64>,
    /// Outdoor temperature in °C at submission time
    pub temperature: f64,
    pub household_size: i64,
    pub season: Season,
    pub date: NaiveDate,
    pub devices: Vec<DeviceUsage>,
    /// Predicted consumption in kWh
    pub predicted_consumption: f64,
    /// Which model produced the figure (e.g. "random_forest")
    pub model_used: String,
    pub confidence: f64,
    /// Estimated cost in the user's currency; 0 when not supplied
    pub cost: f64,
    /// Estimated emissions in kg CO2; derived at store time
    pub carbon_footprint: f64,
    pub created_at: DateTime<Utc>,
}

/// A prediction to be stored (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub user_id: Option<i64>,
    pub temperature: f64,
    pub household_size: i64,
    pub season: Season,
    pub date: NaiveDate,
    pub devices: Vec<DeviceUsage>,
    pub predicted_consumption: f64,
    pub model_used: String,
    pub confidence: f64,
    pub cost: f64,
    pub carbon_footprint: f64,
}

/// Per-user alerting thresholds
///
/// Reads fall back to these defaults when the user has never saved settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: i64,
    /// Consumption above this (kWh) triggers a high-consumption alert
    pub high_consumption_threshold: f64,
    /// Cost above this triggers a cost alert
    pub cost_threshold: f64,
    /// Baseline used to express alert percentages
    pub normal_consumption: f64,
    pub email_alerts_enabled: bool,
}

impl UserSettings {
    pub fn defaults_for(user_id: i64) -> Self {
        Self {
            user_id,
            high_consumption_threshold: 200.0,
            cost_threshold: 50.0,
            normal_consumption: 150.0,
            email_alerts_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_season_parses_rainy_as_autumn() {
        assert_eq!(Season::from_str("rainy").unwrap(), Season::Autumn);
        assert_eq!(Season::from_str("Autumn/Rainy").unwrap(), Season::Autumn);
        assert_eq!(Season::from_str("WINTER").unwrap(), Season::Winter);
        assert!(Season::from_str("monsoon").is_err());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = UserSettings::defaults_for(7);
        assert_eq!(settings.user_id, 7);
        assert_eq!(settings.high_consumption_threshold, 200.0);
        assert_eq!(settings.cost_threshold, 50.0);
        assert_eq!(settings.normal_consumption, 150.0);
        assert!(settings.email_alerts_enabled);
    }

    #[test]
    fn test_user_public_strips_hash() {
        let user = User {
            id: 1,
            email: "a@b.c".into(),
            password_hash: "$argon2id$...".into(),
            name: "A".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(user.public().email, "a@b.c");
    }
}
