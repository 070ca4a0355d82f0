use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted result of one processed upload.
///
/// Created as a unit by [`crate::HistoryStore::append`] and never mutated
/// afterwards; the store drops it again on eviction or explicit delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: u64,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    pub type_distribution: HashMap<String, u64>,
    pub total_records: u64,
}

impl UploadRecord {
    /// Distribution entries in descending count order, label as tiebreak.
    ///
    /// The stored mapping is unordered; every consumer that iterates it in
    /// an observable way (the PDF report) goes through this.
    pub fn distribution_by_count(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .type_distribution
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Download filename offered for this record's PDF report.
    pub fn report_filename(&self) -> String {
        format!("equipment_report_{}.pdf", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_distribution(entries: &[(&str, u64)]) -> UploadRecord {
        UploadRecord {
            id: 1,
            filename: "plant.csv".to_string(),
            uploaded_at: Utc::now(),
            avg_flowrate: 1.0,
            avg_pressure: 2.0,
            avg_temperature: 3.0,
            type_distribution: entries
                .iter()
                .map(|(label, count)| (label.to_string(), *count))
                .collect(),
            total_records: entries.iter().map(|(_, count)| count).sum(),
        }
    }

    #[test]
    fn distribution_sorts_by_count_then_label() {
        let record =
            record_with_distribution(&[("Valve", 2), ("Pump", 5), ("Mixer", 2), ("Reactor", 1)]);
        let ordered = record.distribution_by_count();
        assert_eq!(
            ordered,
            vec![("Pump", 5), ("Mixer", 2), ("Valve", 2), ("Reactor", 1)]
        );
    }

    #[test]
    fn report_filename_includes_id() {
        let mut record = record_with_distribution(&[("Pump", 1)]);
        record.id = 42;
        assert_eq!(record.report_filename(), "equipment_report_42.pdf");
    }
}
