//! CSV export of stored predictions

use std::io::Write;

use crate::error::Result;
use crate::models::PredictionRecord;

const HEADERS: &[&str] = &[
    "id",
    "date",
    "season",
    "temperature",
    "household_size",
    "devices",
    "predicted_consumption",
    "model_used",
    "confidence",
    "cost",
    "carbon_footprint",
    "created_at",
];

/// Write predictions as CSV to any writer
pub fn write_predictions_csv<W: Write>(records: &[PredictionRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(HEADERS)?;

    for record in records {
        // Devices flatten to "device:minutes" pairs so the column stays
        // readable in a spreadsheet
        let devices = record
            .devices
            .iter()
            .map(|d| format!("{}:{}", d.device, d.minutes))
            .collect::<Vec<_>>()
            .join("; ");

        csv_writer.write_record(&[
            record.id.to_string(),
            record.date.format("%Y-%m-%d").to_string(),
            record.season.to_string(),
            record.temperature.to_string(),
            record.household_size.to_string(),
            devices,
            record.predicted_consumption.to_string(),
            record.model_used.clone(),
            record.confidence.to_string(),
            record.cost.to_string(),
            record.carbon_footprint.to_string(),
            record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Render predictions as a CSV string (for API responses)
pub fn predictions_to_csv(records: &[PredictionRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_predictions_csv(records, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| crate::Error::InvalidData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::models::{DeviceUsage, Season};

    fn record(id: i64, consumption: f64) -> PredictionRecord {
        PredictionRecord {
            id,
            user_id: Some(1),
            temperature: 28.5,
            household_size: 4,
            season: Season::Summer,
            date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            devices: vec![
                DeviceUsage {
                    device: "Air Conditioner".to_string(),
                    minutes: 240,
                },
                DeviceUsage {
                    device: "Washing Machine".to_string(),
                    minutes: 45,
                },
            ],
            predicted_consumption: consumption,
            model_used: "random_forest".to_string(),
            confidence: 0.94,
            cost: 18.2,
            carbon_footprint: consumption * 0.4,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_header_plus_one_line_per_record() {
        let csv = predictions_to_csv(&[record(1, 150.0), record(2, 210.0)]).unwrap();
        let lines: Vec<&str> = csv.trim_end().lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,date,season,temperature"));
        assert!(lines[1].starts_with("1,2026-06-15,summer,28.5,4,"));
        assert!(lines[2].contains("210"));
    }

    #[test]
    fn test_devices_column_flattened() {
        let csv = predictions_to_csv(&[record(1, 150.0)]).unwrap();
        assert!(csv.contains("Air Conditioner:240; Washing Machine:45"));
    }

    #[test]
    fn test_empty_input_is_header_only() {
        let csv = predictions_to_csv(&[]).unwrap();
        assert_eq!(csv.trim_end().lines().count(), 1);
    }
}
