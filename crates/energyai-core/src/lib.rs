//! EnergyAI Core Library
//!
//! Shared functionality for the EnergyAI consumption tracker:
//! - Database access and migrations
//! - Consumption analytics (efficiency score, anomaly detection, insights,
//!   recommendations, carbon estimation)
//! - Threshold alert evaluation and templated email dispatch
//! - Pluggable collaborator clients (weather, ML prediction API, mail relay)
//! - CSV export of stored predictions
//! - Password hashing for user accounts

pub mod alerts;
pub mod analytics;
pub mod auth;
pub mod db;
pub mod error;
pub mod export;
pub mod mail;
pub mod models;
pub mod prediction;
pub mod weather;

pub use alerts::{AlertDispatcher, AlertIntent, AlertKind, PredictionSnapshot, TemplateTable};
pub use analytics::{Impact, Insight, InsightKind, Priority, Recommendation};
pub use db::Database;
pub use error::{Error, Result};
pub use mail::{MailBackend, MailClient, MockMailBackend, OutgoingEmail};
pub use models::{DeviceUsage, NewPrediction, PredictionRecord, Season, User, UserSettings};
pub use prediction::{ModelPredictions, PredictionBackend, PredictionClient, PredictionInput};
pub use weather::{CurrentWeather, WeatherClient};
