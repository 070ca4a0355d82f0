use std::collections::HashMap;

use anyhow::{Context as _, anyhow};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Parsed tabular input, kept as string-keyed rows until validated.
///
/// Uploads arrive with arbitrary column sets; this boundary type holds them
/// untyped so the validator can report missing columns, then [`readings`]
/// projects the rows into typed records for aggregation.
///
/// [`readings`]: CsvTable::readings
#[derive(Debug, Clone)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<HashMap<String, String>>,
}

/// One validated row, projected onto the required columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub equipment_name: String,
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

impl CsvTable {
    /// Parse raw CSV bytes into headers plus one map per data row.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers: Vec<String> = reader
            .headers()
            .context("failed to read CSV header row")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result.with_context(|| format!("failed to parse CSV row {}", idx + 1))?;
            rows.push(
                headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect(),
            );
        }

        Ok(CsvTable { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[HashMap<String, String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Project every row into a typed [`Reading`].
    ///
    /// Callers must validate the header set first; a row that still lacks a
    /// required column, or holds a non-numeric measurement, is an internal
    /// error naming the row and column.
    pub fn readings(&self) -> Result<Vec<Reading>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| Reading::from_row(row, idx + 1))
            .collect()
    }

    /// Rows re-encoded as JSON objects for the upload response.
    ///
    /// Cells that look numeric become JSON numbers, everything else stays a
    /// string, mirroring how the readings were interpreted.
    pub fn raw_rows(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .map(|header| {
                        let cell = row.get(header).map(String::as_str).unwrap_or("");
                        (header.clone(), infer_value(cell))
                    })
                    .collect()
            })
            .collect()
    }
}

impl Reading {
    fn from_row(row: &HashMap<String, String>, line: usize) -> Result<Self> {
        Ok(Reading {
            equipment_name: required_cell(row, "Equipment Name", line)?.to_string(),
            equipment_type: required_cell(row, "Type", line)?.to_string(),
            flowrate: numeric_cell(row, "Flowrate", line)?,
            pressure: numeric_cell(row, "Pressure", line)?,
            temperature: numeric_cell(row, "Temperature", line)?,
        })
    }
}

fn required_cell<'a>(row: &'a HashMap<String, String>, column: &str, line: usize) -> Result<&'a str> {
    row.get(column)
        .map(String::as_str)
        .ok_or_else(|| Error::Internal(anyhow!("row {line}: missing {column:?} cell")))
}

fn numeric_cell(row: &HashMap<String, String>, column: &str, line: usize) -> Result<f64> {
    let raw = required_cell(row, column, line)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::Internal(anyhow!("row {line}: invalid {column} value {raw:?}")))
}

fn infer_value(cell: &str) -> Value {
    let trimmed = cell.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    Value::String(cell.to_string())
}
