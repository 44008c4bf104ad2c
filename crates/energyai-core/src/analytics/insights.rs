//! Display insights derived from stored predictions and current weather

use serde::{Deserialize, Serialize};

use super::stats::{detect_anomalies, efficiency_score, DEFAULT_ANOMALY_SIGMA};
use crate::models::PredictionRecord;
use crate::weather::CurrentWeather;

/// Efficiency score below which the low-efficiency warning fires
const LOW_EFFICIENCY_SCORE: f64 = 60.0;

/// Outdoor temperature above which the cooling tip fires (°C)
const HOT_WEATHER_TEMP: f64 = 30.0;

/// Kind of insight, mirrored in the dashboard styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Tip,
    Alert,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Tip => "tip",
            Self::Alert => "alert",
        }
    }
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display priority of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A transient insight computed per request, never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
}

/// Derive insights from a prediction snapshot and optional current weather
///
/// Output order is the fixed evaluation order below, not priority order.
/// An empty snapshot yields no insights.
pub fn generate_insights(
    records: &[PredictionRecord],
    weather: Option<&CurrentWeather>,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if records.is_empty() {
        return insights;
    }

    let efficiency = efficiency_score(records);
    if efficiency < LOW_EFFICIENCY_SCORE {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Low Efficiency Detected".to_string(),
            message: format!(
                "Your energy efficiency score is {:.1}%. Consider optimizing device usage.",
                efficiency
            ),
            priority: Priority::High,
        });
    }

    if let Some(weather) = weather {
        if weather.temperature > HOT_WEATHER_TEMP {
            insights.push(Insight {
                kind: InsightKind::Tip,
                title: "Hot Weather Alert".to_string(),
                message: "High temperatures detected. Consider setting AC to 24°C to save energy."
                    .to_string(),
                priority: Priority::Medium,
            });
        }
    }

    let anomalies = detect_anomalies(records, DEFAULT_ANOMALY_SIGMA);
    if !anomalies.is_empty() {
        insights.push(Insight {
            kind: InsightKind::Alert,
            title: "Unusual Usage Pattern".to_string(),
            message: format!(
                "{} anomalous consumption patterns detected in recent predictions.",
                anomalies.len()
            ),
            priority: Priority::High,
        });
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::models::Season;

    fn records(values: &[f64]) -> Vec<PredictionRecord> {
        values
            .iter()
            .map(|&consumption| PredictionRecord {
                id: 0,
                user_id: None,
                temperature: 25.0,
                household_size: 4,
                season: Season::Summer,
                date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
                devices: vec![],
                predicted_consumption: consumption,
                model_used: "random_forest".to_string(),
                confidence: 0.9,
                cost: 0.0,
                carbon_footprint: 0.0,
                created_at: Utc::now(),
            })
            .collect()
    }

    fn weather(temperature: f64) -> CurrentWeather {
        CurrentWeather {
            temperature,
            humidity: 60,
            wind_speed: 5.0,
            description: "clear sky".to_string(),
            pressure: 1013,
        }
    }

    #[test]
    fn test_no_records_no_insights() {
        assert!(generate_insights(&[], Some(&weather(35.0))).is_empty());
    }

    #[test]
    fn test_low_efficiency_warning() {
        // avg = 240 -> score 40, below the 60 threshold
        let recs = records(&[240.0]);
        let insights = generate_insights(&recs, None);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(insights[0].priority, Priority::High);
        assert!(insights[0].message.contains("40.0%"));
    }

    #[test]
    fn test_efficient_usage_no_warning() {
        let recs = records(&[140.0]);
        assert!(generate_insights(&recs, None).is_empty());
    }

    #[test]
    fn test_hot_weather_tip() {
        let recs = records(&[140.0]);
        let insights = generate_insights(&recs, Some(&weather(32.0)));

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Tip);
        assert_eq!(insights[0].priority, Priority::Medium);

        // 30.0 is not strictly greater than the threshold
        assert!(generate_insights(&recs, Some(&weather(30.0))).is_empty());
    }

    #[test]
    fn test_anomaly_alert_with_count() {
        let mut values = vec![100.0; 9];
        values.push(500.0);
        let recs = records(&values);

        let insights = generate_insights(&recs, None);
        let alert = insights
            .iter()
            .find(|i| i.kind == InsightKind::Alert)
            .expect("anomaly insight");
        assert!(alert.message.starts_with("1 anomalous"));
    }

    #[test]
    fn test_evaluation_order_is_stable() {
        // All three checks fire: inefficient, hot, anomalous
        let mut values = vec![300.0; 9];
        values.push(900.0);
        let recs = records(&values);

        let insights = generate_insights(&recs, Some(&weather(35.0)));
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(insights[1].kind, InsightKind::Tip);
        assert_eq!(insights[2].kind, InsightKind::Alert);
    }
}
