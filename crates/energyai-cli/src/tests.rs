//! CLI command tests

use chrono::NaiveDate;
use tempfile::TempDir;

use energyai_core::models::{DeviceUsage, NewPrediction, Season};

use crate::commands;

fn seed_prediction(db: &energyai_core::Database, consumption: f64) {
    db.insert_prediction(&NewPrediction {
        user_id: None,
        temperature: 24.0,
        household_size: 3,
        season: Season::Spring,
        date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
        devices: vec![DeviceUsage {
            device: "Refrigerator".to_string(),
            minutes: 1440,
        }],
        predicted_consumption: consumption,
        model_used: "random_forest".to_string(),
        confidence: 0.94,
        cost: 0.0,
        carbon_footprint: consumption * 0.4,
    })
    .unwrap();
}

#[test]
fn test_init_creates_database_file() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("energyai.db");

    commands::cmd_init(&db_path).unwrap();
    assert!(db_path.exists());

    // Idempotent: a second init just re-runs migrations
    commands::cmd_init(&db_path).unwrap();
}

#[test]
fn test_predictions_and_analyze_run_on_seeded_db() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("energyai.db");

    let db = commands::open_db(&db_path).unwrap();
    for consumption in [120.0, 180.0, 240.0] {
        seed_prediction(&db, consumption);
    }

    commands::cmd_predictions(&db_path, 10).unwrap();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(commands::cmd_analyze(&db_path, None, 30)).unwrap();
}

#[test]
fn test_export_writes_csv_file() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("energyai.db");
    let out_path = dir.path().join("predictions.csv");

    let db = commands::open_db(&db_path).unwrap();
    seed_prediction(&db, 150.0);
    seed_prediction(&db, 210.0);

    commands::cmd_export(&db_path, Some(&out_path), 100).unwrap();

    let csv = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = csv.trim_end().lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("id,date,season"));
}
