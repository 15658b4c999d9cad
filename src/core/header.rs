use crate::core::{RawTable, Result, Row, Table};
use crate::utils::error::EtlError;

/// Finds the first row holding `marker` as a cell, takes it as the header and
/// keys every row beneath it by those column names. Rows above are discarded.
pub fn locate_header(raw: &RawTable, marker: &str) -> Result<Table> {
    if raw.rows.is_empty() {
        return Err(EtlError::EmptyTable {
            sheet: raw.sheet.clone(),
        });
    }

    let header_index = raw
        .rows
        .iter()
        .position(|row| row.iter().any(|cell| cell == marker))
        .ok_or_else(|| EtlError::HeaderNotFound {
            marker: marker.to_string(),
            sheet: raw.sheet.clone(),
        })?;

    let header = raw.rows[header_index].clone();
    tracing::debug!(
        "Header for '{}' found at row {} with {} columns",
        raw.sheet,
        header_index + 1,
        header.len()
    );

    let rows = raw.rows[header_index + 1..]
        .iter()
        .map(|cells| zip_row(&header, cells))
        .collect();

    Ok(Table {
        sheet: raw.sheet.clone(),
        header,
        rows,
    })
}

fn zip_row(header: &[String], cells: &[String]) -> Row {
    header
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let value = cells.get(i).map(String::as_str).unwrap_or_default();
            (column.as_str(), value)
        })
        .collect()
}
