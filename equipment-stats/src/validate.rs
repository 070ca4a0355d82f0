use crate::error::{Error, Result};
use crate::table::CsvTable;

/// Columns an upload must carry, in reporting order. Exact, case-sensitive.
pub const REQUIRED_COLUMNS: [&str; 5] =
    ["Equipment Name", "Type", "Flowrate", "Pressure", "Temperature"];

/// Check that the table carries every required column.
///
/// All missing columns are reported in one failure, joined in
/// [`REQUIRED_COLUMNS`] order.
pub fn validate_columns(table: &CsvTable) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !table.headers().iter().any(|header| header == *required))
        .copied()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_table_with_all_required_columns() {
        let table = CsvTable::parse(
            b"Equipment Name,Type,Flowrate,Pressure,Temperature\nPump1,Pump,1,2,3\n",
        )
        .unwrap();
        assert!(validate_columns(&table).is_ok());
    }

    #[test]
    fn extra_columns_are_allowed() {
        let table = CsvTable::parse(
            b"Equipment Name,Type,Flowrate,Pressure,Temperature,Operator\nPump1,Pump,1,2,3,Ada\n",
        )
        .unwrap();
        assert!(validate_columns(&table).is_ok());
    }

    #[test]
    fn reports_a_single_missing_column() {
        let table = CsvTable::parse(b"Equipment Name,Type,Flowrate,Temperature\n").unwrap();
        let err = validate_columns(&table).unwrap_err();
        assert_eq!(err.to_string(), "Missing required columns: Pressure");
    }

    #[test]
    fn reports_all_missing_columns_in_required_order() {
        let table = CsvTable::parse(b"Type,Pressure\n").unwrap();
        let err = validate_columns(&table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required columns: Equipment Name, Flowrate, Temperature"
        );
    }

    #[test]
    fn column_match_is_case_sensitive() {
        let table = CsvTable::parse(b"equipment name,type,flowrate,pressure,temperature\n").unwrap();
        let err = validate_columns(&table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required columns: Equipment Name, Type, Flowrate, Pressure, Temperature"
        );
    }
}
