//! Library export to a delimited text file

use std::path::Path;

use crate::domain::{PaperRecord, CANONICAL_COLUMNS};
use crate::error::LibraryError;

/// Write the table as CSV: one row per record, header = canonical field
/// names, `id` as the index column. Nested fields are serialized as JSON
/// strings.
pub fn export_csv(records: &[PaperRecord], path: &Path) -> Result<(), LibraryError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|error| LibraryError::Export(error.to_string()))?;

    writer
        .write_record(CANONICAL_COLUMNS)
        .map_err(|error| LibraryError::Export(error.to_string()))?;

    for record in records {
        let row: Vec<String> = CANONICAL_COLUMNS
            .iter()
            .map(|column| record.column_value(column))
            .collect();
        writer
            .write_record(&row)
            .map_err(|error| LibraryError::Export(error.to_string()))?;
    }

    writer
        .flush()
        .map_err(|error| LibraryError::Export(error.to_string()))?;
    Ok(())
}
