//! Integration tests for energyai-core
//!
//! These tests exercise the full store → analyze → alert workflow.

use chrono::NaiveDate;

use energyai_core::{
    alerts::{check_thresholds, AlertDispatcher, AlertKind, PredictionSnapshot},
    analytics::{detect_anomalies, efficiency_score, generate_insights, generate_recommendations},
    db::Database,
    mail::{MailClient, MockMailBackend},
    models::{DeviceUsage, NewPrediction, Season},
};

/// A week of predictions for one household: steady usage with one spike
fn seed_week(db: &Database, user_id: i64) {
    let values = [148.0, 152.0, 150.0, 149.0, 151.0, 150.0, 420.0];
    for (i, consumption) in values.iter().enumerate() {
        db.insert_prediction(&NewPrediction {
            user_id: Some(user_id),
            temperature: 27.0,
            household_size: 4,
            season: Season::Summer,
            date: NaiveDate::from_ymd_opt(2026, 6, 1 + i as u32).unwrap(),
            devices: vec![DeviceUsage {
                device: "Air Conditioner".to_string(),
                minutes: 180,
            }],
            predicted_consumption: *consumption,
            model_used: "random_forest".to_string(),
            confidence: 0.94,
            cost: consumption * 0.12,
            carbon_footprint: consumption * 0.4,
        })
        .unwrap();
    }
}

#[test]
fn test_store_then_analyze_workflow() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("ana@example.com", "hash", "Ana").unwrap();

    seed_week(&db, user_id);

    let records = db.recent_predictions_for_user(user_id, 30).unwrap();
    assert_eq!(records.len(), 7);

    // The spike drags the average up; the score drops but stays in range
    let score = efficiency_score(&records);
    assert!(score > 0.0 && score < 100.0);

    // The 420 kWh day stands out from the steady baseline
    let anomalies = detect_anomalies(&records, 2.0);
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].predicted_consumption, 420.0);

    // Without weather, the anomaly alert is the only insight here
    let insights = generate_insights(&records, None);
    assert_eq!(insights.len(), 1);
    assert!(insights[0].message.starts_with("1 anomalous"));

    // Steady ~150 kWh usage only earns the general LED recommendation
    let recommendations = generate_recommendations(&records, None);
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].category, "general");
}

#[tokio::test]
async fn test_threshold_to_delivery_workflow() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("ben@example.com", "hash", "Ben").unwrap();

    // Default settings: 200 kWh / $50 thresholds
    let settings = db.get_user_settings(user_id).unwrap();

    let snapshot = PredictionSnapshot {
        consumption: 420.0,
        cost: 50.4,
    };
    let intents = check_thresholds(&snapshot, &settings);
    assert_eq!(intents.len(), 2);
    assert_eq!(intents[0].kind, AlertKind::HighConsumption);
    assert_eq!(intents[1].kind, AlertKind::CostThreshold);

    let mail = MockMailBackend::new();
    let dispatcher = AlertDispatcher::new(MailClient::Mock(mail.clone()), "alerts@energyai.local");

    let accepted = dispatcher.dispatch_all("ben@example.com", &intents).await;
    assert_eq!(accepted, 2);

    let sent = mail.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].subject.contains("High Energy Consumption"));
    assert!(sent[0].html.contains("420 kWh"));
    // round(((420 - 150) / 150) * 100) == 180
    assert!(sent[0].html.contains("180% above normal"));
    assert!(sent[1].subject.contains("Cost Threshold"));
    assert!(sent[1].html.contains("$50.4"));
}

#[tokio::test]
async fn test_disabled_transport_never_blocks_evaluation() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("cal@example.com", "hash", "Cal").unwrap();
    let settings = db.get_user_settings(user_id).unwrap();

    let intents = check_thresholds(
        &PredictionSnapshot {
            consumption: 300.0,
            cost: 0.0,
        },
        &settings,
    );
    assert_eq!(intents.len(), 1);

    // A failing transport reports false per intent, nothing propagates
    let dispatcher = AlertDispatcher::new(
        MailClient::Mock(MockMailBackend::failing()),
        "alerts@energyai.local",
    );
    let accepted = dispatcher.dispatch_all("cal@example.com", &intents).await;
    assert_eq!(accepted, 0);
}
