//! Savings recommendations derived from average consumption and weather

use serde::{Deserialize, Serialize};

use crate::models::PredictionRecord;
use crate::weather::CurrentWeather;

/// Average consumption (kWh) above which the device recommendation fires
const HIGH_USAGE_KWH: f64 = 200.0;

/// Outdoor temperature below which the heating recommendation fires (°C)
const COLD_WEATHER_TEMP: f64 = 20.0;

/// Expected impact of following a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// A transient savings recommendation, never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    /// Display range, e.g. "15-25%"
    pub estimated_savings: String,
}

/// Derive recommendations from a prediction snapshot and optional weather
///
/// Order is fixed: devices, heating, then the general LED entry. The LED
/// recommendation always closes a non-empty result; an empty snapshot yields
/// nothing at all.
pub fn generate_recommendations(
    records: &[PredictionRecord],
    weather: Option<&CurrentWeather>,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if records.is_empty() {
        return recommendations;
    }

    let avg = records
        .iter()
        .map(|r| r.predicted_consumption)
        .sum::<f64>()
        / records.len() as f64;

    if avg > HIGH_USAGE_KWH {
        recommendations.push(Recommendation {
            category: "devices".to_string(),
            title: "Optimize Device Usage".to_string(),
            description: "Consider reducing AC usage during peak hours".to_string(),
            impact: Impact::High,
            estimated_savings: "15-25%".to_string(),
        });
    }

    if let Some(weather) = weather {
        if weather.temperature < COLD_WEATHER_TEMP {
            recommendations.push(Recommendation {
                category: "heating".to_string(),
                title: "Efficient Heating".to_string(),
                description: "Use programmable thermostat to optimize heating schedules"
                    .to_string(),
                impact: Impact::Medium,
                estimated_savings: "10-15%".to_string(),
            });
        }
    }

    recommendations.push(Recommendation {
        category: "general".to_string(),
        title: "LED Lighting".to_string(),
        description: "Switch to LED bulbs for 80% lighting energy savings".to_string(),
        impact: Impact::Low,
        estimated_savings: "5-10%".to_string(),
    });

    recommendations
}
