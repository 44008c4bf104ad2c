//! Threshold evaluation for newly stored predictions

use crate::models::UserSettings;

use super::{AlertIntent, AlertKind};

/// The two fields of a prediction the thresholds look at
#[derive(Debug, Clone, Copy)]
pub struct PredictionSnapshot {
    /// kWh
    pub consumption: f64,
    pub cost: f64,
}

/// Compare a prediction against a user's thresholds
///
/// The two checks are independent; zero, one or two intents may result.
/// The high-consumption percentage is expressed against `normal_consumption`,
/// not the threshold, so it can be negative while the absolute threshold is
/// still exceeded. That is intended behavior.
///
/// Pure decision function: no storage, no network.
pub fn check_thresholds(
    prediction: &PredictionSnapshot,
    settings: &UserSettings,
) -> Vec<AlertIntent> {
    let mut intents = Vec::new();

    if prediction.consumption > settings.high_consumption_threshold {
        let percentage = ((prediction.consumption - settings.normal_consumption)
            / settings.normal_consumption
            * 100.0)
            .round();

        intents.push(
            AlertIntent::new(AlertKind::HighConsumption)
                .with_field("consumption", prediction.consumption)
                .with_field("percentage", percentage),
        );
    }

    if prediction.cost > settings.cost_threshold {
        intents.push(
            AlertIntent::new(AlertKind::CostThreshold)
                .with_field("cost", prediction.cost)
                .with_field("threshold", settings.cost_threshold),
        );
    }

    intents
}
