//! Efficiency scoring and anomaly detection over prediction series

use crate::models::PredictionRecord;

/// Baseline consumption in kWh; the zero-point of the efficiency score
pub const BENCHMARK_KWH: f64 = 150.0;

/// Default deviation multiple for anomaly detection
pub const DEFAULT_ANOMALY_SIGMA: f64 = 2.0;

/// Minimum series length before anomaly detection is meaningful
pub const MIN_ANOMALY_SAMPLES: usize = 3;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by N, not N-1)
fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Score average consumption against the fixed benchmark, clamped to [0, 100]
///
/// 100 means the average sits at or below the benchmark; every percent of
/// consumption above it costs one point. Empty input scores 0.
pub fn efficiency_score(records: &[PredictionRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let values: Vec<f64> = records.iter().map(|r| r.predicted_consumption).collect();
    let avg = mean(&values);

    let raw = 100.0 - ((avg - BENCHMARK_KWH) / BENCHMARK_KWH) * 100.0;
    raw.clamp(0.0, 100.0)
}

/// Records whose consumption deviates from the sample mean by more than
/// `threshold_sigma` population standard deviations
///
/// Fewer than [`MIN_ANOMALY_SAMPLES`] records yields nothing; so does a
/// series with zero spread.
pub fn detect_anomalies(
    records: &[PredictionRecord],
    threshold_sigma: f64,
) -> Vec<&PredictionRecord> {
    if records.len() < MIN_ANOMALY_SAMPLES {
        return Vec::new();
    }

    let values: Vec<f64> = records.iter().map(|r| r.predicted_consumption).collect();
    let mean = mean(&values);
    let std_dev = population_std_dev(&values, mean);

    // Zero spread means nothing can exceed the band
    if std_dev == 0.0 {
        return Vec::new();
    }

    records
        .iter()
        .filter(|r| (r.predicted_consumption - mean).abs() > threshold_sigma * std_dev)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::models::Season;

    fn record(consumption: f64) -> PredictionRecord {
        PredictionRecord {
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
        }
    }

    fn records(values: &[f64]) -> Vec<PredictionRecord> {
        values.iter().copied().map(record).collect()
    }

    #[test]
    fn test_efficiency_empty_is_zero() {
        assert_eq!(efficiency_score(&[]), 0.0);
    }

    #[test]
    fn test_efficiency_at_benchmark_is_100() {
        let recs = records(&[150.0]);
        assert_eq!(efficiency_score(&recs), 100.0);
    }

    #[test]
    fn test_efficiency_clamps_both_ends() {
        // Average far above benchmark: raw score is deeply negative
        let high = records(&[600.0, 600.0]);
        assert_eq!(efficiency_score(&high), 0.0);

        // Average below benchmark: raw score exceeds 100
        let low = records(&[50.0]);
        assert_eq!(efficiency_score(&low), 100.0);
    }

    #[test]
    fn test_efficiency_linear_between_bounds() {
        // avg = 225, 50% above benchmark -> score 50
        let recs = records(&[200.0, 250.0]);
        assert!((efficiency_score(&recs) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_anomalies_need_three_points() {
        assert!(detect_anomalies(&[], DEFAULT_ANOMALY_SIGMA).is_empty());
        let two = records(&[10.0, 1000.0]);
        assert!(detect_anomalies(&two, DEFAULT_ANOMALY_SIGMA).is_empty());
    }

    #[test]
    fn test_single_outlier_in_four_points_not_flagged() {
        // mean = 175, population stddev ~= 129.9; 2 sigma band ~= 259.8 so
        // even the 400 stays inside it
        let recs = records(&[100.0, 100.0, 100.0, 400.0]);
        assert!(detect_anomalies(&recs, 2.0).is_empty());
    }

    #[test]
    fn test_outlier_flagged_in_larger_series() {
        let recs = records(&[100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 500.0]);
        let anomalies = detect_anomalies(&recs, 2.0);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].predicted_consumption, 500.0);
    }

    #[test]
    fn test_zero_spread_yields_nothing() {
        let recs = records(&[150.0, 150.0, 150.0, 150.0]);
        assert!(detect_anomalies(&recs, 2.0).is_empty());
    }

    #[test]
    fn test_pure_functions_are_idempotent() {
        let recs = records(&[120.0, 180.0, 240.0, 90.0]);
        assert_eq!(efficiency_score(&recs), efficiency_score(&recs));
        assert_eq!(
            detect_anomalies(&recs, 2.0).len(),
            detect_anomalies(&recs, 2.0).len()
        );
    }
}
