use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::record::UploadRecord;
use crate::table::Reading;

/// Aggregated statistics for one upload's readings.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    pub type_distribution: HashMap<String, u64>,
    pub total_records: u64,
}

impl Summary {
    /// Aggregate a full set of readings.
    ///
    /// Averages are arithmetic means over every row, rounded to two decimal
    /// places half-to-even. The distribution counts rows per distinct
    /// equipment type, so its values always sum to `total_records`.
    /// Zero rows fail with [`Error::EmptyInput`] since no mean is defined.
    pub fn from_readings(readings: &[Reading]) -> Result<Self> {
        if readings.is_empty() {
            return Err(Error::EmptyInput);
        }

        let count = readings.len() as f64;
        let mut flowrate_sum = 0.0;
        let mut pressure_sum = 0.0;
        let mut temperature_sum = 0.0;
        let mut type_distribution: HashMap<String, u64> = HashMap::new();

        for reading in readings {
            flowrate_sum += reading.flowrate;
            pressure_sum += reading.pressure;
            temperature_sum += reading.temperature;
            *type_distribution
                .entry(reading.equipment_type.clone())
                .or_insert(0) += 1;
        }

        Ok(Summary {
            avg_flowrate: round2(flowrate_sum / count),
            avg_pressure: round2(pressure_sum / count),
            avg_temperature: round2(temperature_sum / count),
            type_distribution,
            total_records: readings.len() as u64,
        })
    }

    /// Mint the persisted record for this summary.
    pub(crate) fn into_record(
        self,
        id: u64,
        filename: &str,
        uploaded_at: DateTime<Utc>,
    ) -> UploadRecord {
        UploadRecord {
            id,
            filename: filename.to_string(),
            uploaded_at,
            avg_flowrate: self.avg_flowrate,
            avg_pressure: self.avg_pressure,
            avg_temperature: self.avg_temperature,
            type_distribution: self.type_distribution,
            total_records: self.total_records,
        }
    }
}

/// Round to two decimal places, ties to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
