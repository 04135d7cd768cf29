//! In-memory log of served predictions, with CSV export.
//!
//! Process-lifetime only: nothing is written to disk and the log is capped,
//! dropping the oldest entries first.

use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;

use crate::models::{ClimateReading, PredictionResult, RiskLabel};

const HISTORY_CAP: usize = 500;

pub const CSV_HEADER: &str =
    "recorded_at,relative_humidity_percent,wind_speed_kmh,temperature_celsius,risk_label,risk_probability";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryEntry {
    pub recorded_at: String,
    pub relative_humidity_percent: f32,
    pub wind_speed_kmh: f32,
    pub temperature_celsius: f32,
    pub risk_label: RiskLabel,
    pub risk_probability: f32,
}

#[derive(Default)]
pub struct PredictionHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl PredictionHistory {
    pub fn record(&self, reading: &ClimateReading, result: &PredictionResult) {
        let entry = HistoryEntry {
            recorded_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            relative_humidity_percent: reading.relative_humidity_percent,
            wind_speed_kmh: reading.wind_speed_kmh,
            temperature_celsius: reading.temperature_celsius,
            risk_label: result.risk_label,
            risk_probability: result.risk_probability,
        };

        let mut entries = self.lock();
        entries.push(entry);
        if entries.len() > HISTORY_CAP {
            let excess = entries.len() - HISTORY_CAP;
            entries.drain(..excess);
        }
    }

    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.lock().clone()
    }

    pub fn to_csv(&self) -> String {
        let entries = self.lock();
        let mut csv = String::from(CSV_HEADER);
        csv.push('\n');
        for entry in entries.iter() {
            csv.push_str(&format!(
                "{},{},{},{},{},{:.4}\n",
                entry.recorded_at,
                entry.relative_humidity_percent,
                entry.wind_speed_kmh,
                entry.temperature_celsius,
                label_text(entry.risk_label),
                entry.risk_probability,
            ));
        }
        csv
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn label_text(label: RiskLabel) -> &'static str {
    match label {
        RiskLabel::Low => "LOW",
        RiskLabel::ModerateOrHigh => "MODERATE_OR_HIGH",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::classify;

    fn reading() -> ClimateReading {
        ClimateReading {
            relative_humidity_percent: 35.0,
            wind_speed_kmh: 22.0,
            temperature_celsius: 38.0,
        }
    }

    #[test]
    fn records_are_snapshotted_in_order() {
        let history = PredictionHistory::default();
        history.record(&reading(), &classify(0.8, 0.5));
        history.record(&reading(), &classify(0.1, 0.5));

        let entries = history.snapshot();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].risk_label, RiskLabel::ModerateOrHigh);
        assert_eq!(entries[1].risk_label, RiskLabel::Low);
        assert_eq!(entries[0].relative_humidity_percent, 35.0);
    }

    #[test]
    fn cap_drops_oldest_entries() {
        let history = PredictionHistory::default();
        for i in 0..(HISTORY_CAP + 10) {
            let result = classify(if i == 0 { 0.9 } else { 0.1 }, 0.5);
            history.record(&reading(), &result);
        }

        let entries = history.snapshot();
        assert_eq!(entries.len(), HISTORY_CAP);
        assert!(entries.iter().all(|e| e.risk_label == RiskLabel::Low));
    }

    #[test]
    fn csv_has_header_and_one_row_per_entry() {
        let history = PredictionHistory::default();
        history.record(&reading(), &classify(0.75, 0.5));

        let csv = history.to_csv();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));

        let row = lines.next().unwrap();
        assert!(row.contains("MODERATE_OR_HIGH"));
        assert!(row.contains("0.7500"));
        assert_eq!(lines.next(), None);
    }
}
