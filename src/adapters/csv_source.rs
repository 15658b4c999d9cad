use crate::core::{RawTable, SheetRef, TableSource};
use crate::utils::error::{EtlError, Result};
use std::path::PathBuf;

/// Reads worksheets exported as `{base_path}/{spreadsheet}/{worksheet}.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    base_path: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn path_for(&self, sheet: &SheetRef) -> PathBuf {
        self.base_path
            .join(&sheet.spreadsheet)
            .join(format!("{}.csv", sheet.worksheet))
    }
}

impl TableSource for CsvDirectorySource {
    async fn fetch_table(&self, sheet: &SheetRef) -> Result<RawTable> {
        let path = self.path_for(sheet);
        tracing::debug!("Reading worksheet {} from {}", sheet, path.display());

        let data = std::fs::read(&path).map_err(|e| EtlError::Source {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;

        parse_csv(&sheet.worksheet, &data)
    }
}

/// Parses CSV bytes into raw rows. No header handling: the first line is just
/// another row. Ragged lines are allowed and cells are kept untrimmed.
pub fn parse_csv(sheet: &str, data: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(sheet, rows))
}
