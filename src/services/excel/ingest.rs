use bytes::Bytes;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use std::collections::HashSet;
use std::io::Cursor;

use super::types::{CellValue, Dataset, RawGrid, Row};
use super::utils::excel_serial_to_iso;
use super::AnalyzerError;

/// A workbook requires a header row plus at least this many surviving data
/// rows before analysis is attempted.
const MIN_DATA_ROWS: usize = 2;

#[derive(Debug)]
pub struct ParsedWorkbook {
    pub sheet_names: Vec<String>,
    pub grid: RawGrid,
}

/// Opens an XLSX byte buffer and reads the first sheet into a raw grid of
/// tagged cells. No cleaning happens here; that is `ingest_grid`'s job.
pub fn parse_workbook(file_data: Bytes) -> Result<ParsedWorkbook, AnalyzerError> {
    let start = std::time::Instant::now();
    let cursor = Cursor::new(file_data);

    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor).map_err(|e| {
        tracing::error!("Failed to open workbook: {}", e);
        AnalyzerError::MalformedFile(format!("Failed to open Excel file: {}", e))
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| AnalyzerError::MalformedFile("No sheets found in workbook".to_string()))?;

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| AnalyzerError::MalformedFile(format!("Failed to read worksheet: {}", e)))?;

    let grid: RawGrid = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    tracing::info!(
        "Parsed sheet {} ({} raw rows) in {:?}",
        first_sheet,
        grid.len(),
        start.elapsed()
    );

    Ok(ParsedWorkbook { sheet_names, grid })
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => excel_serial_to_iso(dt.as_f64())
            .map(CellValue::Date)
            .unwrap_or(CellValue::Null),
        Data::DateTimeIso(s) => CellValue::Date(s.split('T').next().unwrap_or(s).to_string()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

/// Turns a raw grid into clean row records: derived headers, trimmed text,
/// whitespace normalized to null, all-empty rows dropped. Pure transform;
/// classification happens downstream.
pub fn ingest_grid(grid: &RawGrid) -> Result<Dataset, AnalyzerError> {
    if grid.is_empty() {
        return Err(AnalyzerError::EmptyInput);
    }

    let columns = derive_headers(&grid[0]);
    let mut rows = Vec::with_capacity(grid.len().saturating_sub(1));

    for raw in grid.iter().skip(1) {
        let mut row = Row::with_capacity(columns.len());
        let mut all_null = true;
        for (idx, name) in columns.iter().enumerate() {
            let value = normalize_cell(raw.get(idx));
            if !value.is_null() {
                all_null = false;
            }
            row.insert(name.clone(), value);
        }
        if !all_null {
            rows.push(row);
        }
    }

    if rows.len() < MIN_DATA_ROWS {
        return Err(AnalyzerError::NoValidData(rows.len()));
    }

    Ok(Dataset { columns, rows })
}

/// Headers are trimmed; blank or duplicate names become `Column_<i>`
/// (1-based), deterministically for the same input.
fn derive_headers(header_row: &[CellValue]) -> Vec<String> {
    let mut seen = HashSet::new();
    header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let trimmed = cell.to_string().trim().to_string();
            if trimmed.is_empty() || !seen.insert(trimmed.clone()) {
                format!("Column_{}", idx + 1)
            } else {
                trimmed
            }
        })
        .collect()
}

fn normalize_cell(cell: Option<&CellValue>) -> CellValue {
    match cell {
        None | Some(CellValue::Null) => CellValue::Null,
        Some(CellValue::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        Some(value) => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_grid(rows: &[&[&str]]) -> RawGrid {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|cell| CellValue::Text((*cell).to_string()))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(matches!(
            ingest_grid(&RawGrid::new()),
            Err(AnalyzerError::EmptyInput)
        ));
    }

    #[test]
    fn single_data_row_is_rejected() {
        let grid = text_grid(&[&["Region", "Sales"], &["North", "100"]]);
        assert!(matches!(
            ingest_grid(&grid),
            Err(AnalyzerError::NoValidData(1))
        ));
    }

    #[test]
    fn header_only_grid_is_rejected() {
        let grid = text_grid(&[&["Region", "Sales"]]);
        assert!(matches!(
            ingest_grid(&grid),
            Err(AnalyzerError::NoValidData(0))
        ));
    }

    #[test]
    fn blank_headers_get_positional_names() {
        let grid = text_grid(&[
            &["", "Sales", "  "],
            &["North", "100", "x"],
            &["South", "200", "y"],
        ]);
        let dataset = ingest_grid(&grid).unwrap();
        assert_eq!(dataset.columns, vec!["Column_1", "Sales", "Column_3"]);
    }

    #[test]
    fn duplicate_headers_get_positional_names() {
        let grid = text_grid(&[&["Sales", "Sales"], &["1", "2"], &["3", "4"]]);
        let dataset = ingest_grid(&grid).unwrap();
        assert_eq!(dataset.columns, vec!["Sales", "Column_2"]);
    }

    #[test]
    fn rows_survive_unless_every_cell_is_empty() {
        let grid = text_grid(&[
            &["A", "B"],
            &["1", "2"],
            &["  ", ""],
            &["3", ""],
            &["4", "5"],
        ]);
        let dataset = ingest_grid(&grid).unwrap();
        // only the all-blank row is dropped
        assert_eq!(dataset.rows.len(), 3);
    }

    #[test]
    fn whitespace_cells_normalize_to_null() {
        let grid = text_grid(&[&["A", "B"], &["  x  ", "   "], &["y", "z"]]);
        let dataset = ingest_grid(&grid).unwrap();
        assert_eq!(dataset.rows[0]["A"], CellValue::Text("x".to_string()));
        assert_eq!(dataset.rows[0]["B"], CellValue::Null);
    }

    #[test]
    fn short_rows_are_padded_with_nulls() {
        let grid = text_grid(&[&["A", "B"], &["1"], &["2", "3"]]);
        let dataset = ingest_grid(&grid).unwrap();
        assert_eq!(dataset.rows[0]["B"], CellValue::Null);
    }

    #[test]
    fn numeric_cells_pass_through_unchanged() {
        let grid = vec![
            vec![CellValue::Text("Amount".to_string())],
            vec![CellValue::Number(10.5)],
            vec![CellValue::Number(3.0)],
        ];
        let dataset = ingest_grid(&grid).unwrap();
        assert_eq!(dataset.rows[0]["Amount"], CellValue::Number(10.5));
    }
}
