//! Database layer tests

use chrono::NaiveDate;

use super::Database;
use crate::error::Error;
use crate::models::{DeviceUsage, NewPrediction, Season, UserSettings};

fn sample_prediction(user_id: Option<i64>, consumption: f64) -> NewPrediction {
    NewPrediction {
        user_id,
        temperature: 28.0,
        household_size: 4,
        season: Season::Summer,
        date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
        devices: vec![
            DeviceUsage {
                device: "Air Conditioner".to_string(),
                minutes: 240,
            },
            DeviceUsage {
                device: "Refrigerator".to_string(),
                minutes: 1440,
            },
        ],
        predicted_consumption: consumption,
        model_used: "random_forest".to_string(),
        confidence: 0.94,
        cost: 12.5,
        carbon_footprint: consumption * 0.4,
    }
}

#[test]
fn test_create_and_get_user() {
    let db = Database::in_memory().unwrap();

    let id = db.create_user("alice@example.com", "$argon2id$hash", "Alice").unwrap();

    let user = db.get_user(id).unwrap().unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.name, "Alice");

    let by_email = db.get_user_by_email("alice@example.com").unwrap().unwrap();
    assert_eq!(by_email.id, id);

    assert!(db.get_user_by_email("nobody@example.com").unwrap().is_none());
}

#[test]
fn test_duplicate_email_is_rejected() {
    let db = Database::in_memory().unwrap();

    db.create_user("bob@example.com", "h1", "Bob").unwrap();
    let err = db.create_user("bob@example.com", "h2", "Robert").unwrap_err();
    assert!(matches!(err, Error::EmailTaken));
}

#[test]
fn test_update_user_profile() {
    let db = Database::in_memory().unwrap();

    let id = db.create_user("carol@example.com", "h", "Carol").unwrap();
    db.update_user_profile(id, "Caroline", "caroline@example.com").unwrap();

    let user = db.get_user(id).unwrap().unwrap();
    assert_eq!(user.name, "Caroline");
    assert_eq!(user.email, "caroline@example.com");

    let err = db.update_user_profile(9999, "X", "x@example.com").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_insert_and_fetch_predictions() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("dave@example.com", "h", "Dave").unwrap();

    for consumption in [120.0, 160.0, 210.0] {
        db.insert_prediction(&sample_prediction(Some(user_id), consumption))
            .unwrap();
    }
    // Anonymous submission is stored but not attributed
    db.insert_prediction(&sample_prediction(None, 99.0)).unwrap();

    let records = db.recent_predictions_for_user(user_id, 10).unwrap();
    assert_eq!(records.len(), 3);
    // Newest first
    assert_eq!(records[0].predicted_consumption, 210.0);
    assert_eq!(records[0].season, Season::Summer);
    assert_eq!(records[0].devices.len(), 2);
    assert_eq!(records[0].devices[0].device, "Air Conditioner");

    let all = db.recent_predictions(10).unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(db.count_predictions().unwrap(), 4);
}

#[test]
fn test_prediction_limit_applies() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("erin@example.com", "h", "Erin").unwrap();

    for i in 0..15 {
        db.insert_prediction(&sample_prediction(Some(user_id), 100.0 + i as f64))
            .unwrap();
    }

    let records = db.recent_predictions_for_user(user_id, 10).unwrap();
    assert_eq!(records.len(), 10);
}

#[test]
fn test_settings_default_until_saved() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("frank@example.com", "h", "Frank").unwrap();

    let settings = db.get_user_settings(user_id).unwrap();
    assert_eq!(settings, UserSettings::defaults_for(user_id));

    let updated = UserSettings {
        user_id,
        high_consumption_threshold: 250.0,
        cost_threshold: 75.0,
        normal_consumption: 180.0,
        email_alerts_enabled: false,
    };
    db.upsert_user_settings(&updated).unwrap();

    let settings = db.get_user_settings(user_id).unwrap();
    assert_eq!(settings, updated);

    // Saving again overwrites rather than duplicating
    let again = UserSettings {
        cost_threshold: 80.0,
        ..updated
    };
    db.upsert_user_settings(&again).unwrap();
    assert_eq!(db.get_user_settings(user_id).unwrap().cost_threshold, 80.0);
}
