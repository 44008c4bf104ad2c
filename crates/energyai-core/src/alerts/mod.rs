//! Threshold alerting
//!
//! Split into a pure decision step and a delivery step:
//! - `evaluator` - compares a new prediction against per-user thresholds and
//!   produces [`AlertIntent`]s, without touching storage or the network
//! - `templates` - fixed enum-keyed table mapping each alert kind to its
//!   subject, body and required payload fields
//! - `dispatcher` - renders an intent and attempts one best-effort delivery
//!   through the mail transport
//!
//! Anomaly detection deliberately does not feed this path; anomalies surface
//! as display insights only, while the `anomaly_detected` template remains an
//! independently available capability.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod dispatcher;
mod evaluator;
mod templates;

pub use dispatcher::AlertDispatcher;
pub use evaluator::{check_thresholds, PredictionSnapshot};
pub use templates::{RenderedAlert, TemplateTable};

/// Kind of alert that can be raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    HighConsumption,
    AnomalyDetected,
    CostThreshold,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighConsumption => "high_consumption",
            Self::AnomalyDetected => "anomaly_detected",
            Self::CostThreshold => "cost_threshold",
        }
    }

    /// All kinds, for construction-time template validation
    pub const ALL: [AlertKind; 3] = [
        Self::HighConsumption,
        Self::AnomalyDetected,
        Self::CostThreshold,
    ];
}

impl std::str::FromStr for AlertKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "high_consumption" => Ok(Self::HighConsumption),
            "anomaly_detected" => Ok(Self::AnomalyDetected),
            "cost_threshold" => Ok(Self::CostThreshold),
            _ => Err(format!("Unknown alert kind: {}", s)),
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decision that a notification should be sent, decoupled from delivery
///
/// The payload is a mapping of named numeric fields consumed by the template
/// for the intent's kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertIntent {
    pub kind: AlertKind,
    pub payload: BTreeMap<String, f64>,
}

impl AlertIntent {
    pub fn new(kind: AlertKind) -> Self {
        Self {
            kind,
            payload: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: f64) -> Self {
        self.payload.insert(name.to_string(), value);
        self
    }

    pub fn field(&self, name: &str) -> Option<f64> {
        self.payload.get(name).copied()
    }
}
