//! Command implementations
//!
//! Shared helpers plus one `cmd_*` function per subcommand.

use std::path::Path;

use anyhow::{Context, Result};

use energyai_core::analytics::{
    detect_anomalies, efficiency_score, generate_insights, generate_recommendations,
    DEFAULT_ANOMALY_SIGMA,
};
use energyai_core::db::Database;
use energyai_core::export::predictions_to_csv;
use energyai_core::models::PredictionRecord;
use energyai_core::prediction::PredictionClient;
use energyai_core::weather::WeatherClient;
use energyai_core::AlertDispatcher;

/// Open the database, creating and migrating it as needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Set {} and start the API: energyai serve", energyai_server::JWT_SECRET_ENV);
    println!("  2. Check collaborator health: energyai status");

    Ok(())
}

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting EnergyAI web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;
    let config = energyai_server::ServerConfig::from_env()?;

    let static_dir_str =
        static_dir.map(|p| p.to_str().expect("static_dir path must be valid UTF-8"));
    energyai_server::serve(db, host, port, static_dir_str, config).await?;

    Ok(())
}

pub async fn cmd_status(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;

    println!("📊 EnergyAI Status");
    println!("   ─────────────────────────────");
    println!("   Database: {}", db.path());
    println!("   Users: {}", db.count_users()?);
    println!("   Predictions: {}", db.count_predictions()?);
    println!();

    match WeatherClient::from_env() {
        Some(client) => {
            let healthy = client.health_check().await;
            let mark = if healthy { "✅" } else { "⚠️ " };
            println!("   {} Weather: {}", mark, client.host());
        }
        None => println!("   ℹ️  Weather: not configured (set WEATHER_API_KEY)"),
    }

    match PredictionClient::from_env() {
        Some(client) => {
            let healthy = client.health_check().await;
            let mark = if healthy { "✅" } else { "⚠️ " };
            println!("   {} Prediction service: {}", mark, client.host());
        }
        None => println!("   ℹ️  Prediction service: not configured (set PREDICT_API_URL)"),
    }

    match AlertDispatcher::from_env() {
        Some(dispatcher) => {
            let healthy = dispatcher.health_check().await;
            let mark = if healthy { "✅" } else { "⚠️ " };
            println!("   {} Mail transport: {}", mark, dispatcher.host());
        }
        None => println!("   ℹ️  Mail transport: not configured (set MAIL_RELAY_URL)"),
    }

    Ok(())
}

pub fn cmd_predictions(db_path: &Path, limit: usize) -> Result<()> {
    let db = open_db(db_path)?;
    let records = db.recent_predictions(limit)?;

    if records.is_empty() {
        println!("No predictions stored yet.");
        return Ok(());
    }

    println!(
        "{:<6} {:<12} {:<8} {:>8} {:>12} {:<16} {:>6}",
        "ID", "Date", "Season", "Temp °C", "kWh", "Model", "User"
    );
    println!("{}", "─".repeat(76));

    for record in &records {
        println!(
            "{:<6} {:<12} {:<8} {:>8.1} {:>12.1} {:<16} {:>6}",
            record.id,
            record.date.format("%Y-%m-%d"),
            record.season.as_str(),
            record.temperature,
            record.predicted_consumption,
            record.model_used,
            record
                .user_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    println!();
    println!("{} prediction(s)", records.len());

    Ok(())
}

pub async fn cmd_analyze(db_path: &Path, user: Option<i64>, limit: usize) -> Result<()> {
    let db = open_db(db_path)?;

    let records: Vec<PredictionRecord> = match user {
        Some(user_id) => db.recent_predictions_for_user(user_id, limit)?,
        None => db.recent_predictions(limit)?,
    };

    if records.is_empty() {
        println!("No predictions to analyze.");
        return Ok(());
    }

    // Weather enriches insights when a collaborator is configured
    let weather = match WeatherClient::from_env() {
        Some(client) => Some(client.current().await),
        None => None,
    };

    let efficiency = efficiency_score(&records);
    let anomalies = detect_anomalies(&records, DEFAULT_ANOMALY_SIGMA);

    println!("📊 Consumption Analytics ({} predictions)", records.len());
    println!("   ─────────────────────────────");
    println!("   Efficiency score: {:.1}/100", efficiency);
    if let Some(ref weather) = weather {
        println!(
            "   Current weather: {:.1}°C, {}",
            weather.temperature, weather.description
        );
    }
    println!("   Anomalies (>{}σ): {}", DEFAULT_ANOMALY_SIGMA, anomalies.len());
    for anomaly in &anomalies {
        println!(
            "     #{} on {}: {:.1} kWh",
            anomaly.id,
            anomaly.date.format("%Y-%m-%d"),
            anomaly.predicted_consumption
        );
    }

    let insights = generate_insights(&records, weather.as_ref());
    if !insights.is_empty() {
        println!();
        println!("💡 Insights");
        for insight in &insights {
            println!("   [{}] {}: {}", insight.kind, insight.title, insight.message);
        }
    }

    let recommendations = generate_recommendations(&records, weather.as_ref());
    if !recommendations.is_empty() {
        println!();
        println!("🔋 Recommendations");
        for rec in &recommendations {
            println!(
                "   {} (save {}): {}",
                rec.title, rec.estimated_savings, rec.description
            );
        }
    }

    Ok(())
}

pub fn cmd_export(db_path: &Path, output: Option<&Path>, limit: usize) -> Result<()> {
    let db = open_db(db_path)?;
    let records = db.recent_predictions(limit)?;
    let csv = predictions_to_csv(&records).context("Failed to render CSV")?;

    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Exported {} prediction(s) to {}", records.len(), path.display());
        }
        None => print!("{}", csv),
    }

    Ok(())
}
